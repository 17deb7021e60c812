//! The `smellscore init` command.

use std::path::Path;

use anyhow::Result;

use smellscore_providers::config::CONFIG_FILE_NAME;

pub fn execute() -> Result<()> {
    if Path::new(CONFIG_FILE_NAME).exists() {
        println!("{CONFIG_FILE_NAME} already exists, skipping.");
    } else {
        std::fs::write(CONFIG_FILE_NAME, SAMPLE_CONFIG)?;
        println!("Created {CONFIG_FILE_NAME}");
    }

    println!("\nNext steps:");
    println!("  1. Export OPENAI_API_KEY or edit the [provider] section");
    println!("  2. Run: smellscore checklist");
    println!("  3. Run: smellscore score doc.md");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# smellscore configuration

model = "gpt-4o"
temperature = 0.0
max_tokens = 1024
max_retries = 0
retry_delay_ms = 1000
max_fragment_chars = 5000
output_dir = ""

files = ["doc.md", "doc_1.md", "doc_2.md"]

checklist = [
    "不好的命名",
    "重复代码",
    "过长的函数或方法",
    "缺乏注释和文档",
    "神奇数字（Magic Numbers）",
    "复杂的条件和循环",
    "未处理的异常",
    "无效的或多余的代码",
    "低效的实现",
    "不一致的代码风格",
]

[provider]
type = "openai"
api_key = "${OPENAI_API_KEY}"
timeout_secs = 120

# Offline dry run:
# [provider]
# type = "mock"
# response = "分数: 5\n依据：模拟评分"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_config_parses_to_defaults() {
        let config = smellscore_providers::config::parse_config(SAMPLE_CONFIG).unwrap();
        let defaults = smellscore_providers::SmellscoreConfig::default();
        assert_eq!(config.checklist, defaults.checklist);
        assert_eq!(config.files, defaults.files);
        assert_eq!(config.output_dir, defaults.output_dir);
        assert!(config.validate().is_ok());
    }
}
