//! The `hyakunin init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("hyakunin.toml").exists() {
        println!("hyakunin.toml already exists, skipping.");
    } else {
        std::fs::write("hyakunin.toml", SAMPLE_CONFIG)?;
        println!("Created hyakunin.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit hyakunin.toml to pick question types and a question count");
    println!("  2. Run: hyakunin validate");
    println!("  3. Run: hyakunin play");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# hyakunin configuration

# Corpus JSON to use instead of the bundled 100 poems.
# data_path = "poems.json"

# "sequential" or "random"
order_mode = "random"

# Any of "lower", "upper", "author", "poem".
# One entry fixes the type, several are mixed, an empty list uses all four.
question_types = ["lower"]

# Questions per session; omit to quiz every poem.
max_questions = 10

show_reading = true
show_description = true

output_dir = "./hyakunin-results"
"#;
