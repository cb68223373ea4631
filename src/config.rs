// config.rs
use crate::user_interaction::{get_edited_user_config_input, print_insight_level_2};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source_presets: Vec<SourcePreset>,
    #[serde(default)]
    pub analyst: Analyst,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcePreset {
    pub name: String,
    pub url: String,
}

/// Whoever runs this dashboard. Shows up in the masthead and the caption.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Analyst {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
}

const DEFAULT_CONFIG_TEXT: &str = r#"{
  "source_presets" : [
    {
      "name": "ecommerce-public",
      "url": "https://media.githubusercontent.com/media/Frederickyzw/analisis_data_dicoding/refs/heads/main/dashboard/main_data.csv"
    }
  ],
  "analyst": {
    "name": "",
    "username": "",
    "email": ""
  }
}

SYNTAX
======

{
  "source_presets" : [
    {
      "name": "", // how the FETCH (FROM PRESET) menu lists it
      "url": "" // direct link to a CSV export
    }
  ],
  "analyst": {
    "name": "",
    "username": "",
    "email": ""
  }
}
"#;

pub const CONFIG_SYNTAX: &str = r#"SYNTAX
======

{
  "source_presets" : [
    {
      "name": "", // how the FETCH (FROM PRESET) menu lists it
      "url": "" // direct link to a CSV export
    }
  ],
  "analyst": {
    "name": "",
    "username": "",
    "email": ""
  }
}
    "#;

pub fn ensure_config_file(dash_db_path: &PathBuf) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let config_path = dash_db_path.join("bro.config");
    if !config_path.exists() {
        let mut file = File::create(&config_path)?;
        file.write_all(DEFAULT_CONFIG_TEXT.as_bytes())?;
    }
    Ok(config_path)
}

pub fn load_config(dash_db_path: &PathBuf) -> Result<Config, Box<dyn std::error::Error>> {
    let config_path = ensure_config_file(dash_db_path)?;
    let mut current_config_text = String::new();
    File::open(&config_path)?.read_to_string(&mut current_config_text)?;

    let json_part = current_config_text.split("SYNTAX").next().unwrap_or_default();
    if json_part.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_json::from_str::<Config>(json_part)?)
}

pub fn edit_config(dash_db_path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = ensure_config_file(dash_db_path)?;

    let mut current_config_text = String::new();
    File::open(&config_path)?.read_to_string(&mut current_config_text)?;

    let edited_config_text = get_edited_user_config_input(current_config_text.clone());

    if let Some(json_part) = edited_config_text.split("SYNTAX").next() {
        match serde_json::from_str::<Config>(json_part) {
            Ok(_) => {
                print_insight_level_2("Config's all good, bro!");
            }
            Err(e) => {
                println!();
                print_insight_level_2(&format!("Whoops, hit a snag with that JSON: {}. Mind tweaking the config and trying again?", e));
                return Err(e.into());
            }
        }
    }

    let json_part = edited_config_text
        .split("SYNTAX")
        .next()
        .unwrap_or_default();
    let new_config_content = format!("{}{}", json_part, CONFIG_SYNTAX);

    let mut file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(&config_path)?;
    file.write_all(new_config_content.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("dashbro-config-{}-{}", tag, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn first_load_seeds_the_public_preset() {
        let dir = scratch_dir("seed");
        let config = load_config(&dir).unwrap();
        assert_eq!(config.source_presets.len(), 1);
        assert_eq!(config.source_presets[0].name, "ecommerce-public");
        assert!(config.source_presets[0].url.ends_with("main_data.csv"));
        assert!(config.analyst.name.is_empty());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_ignores_the_syntax_tail() {
        let dir = scratch_dir("tail");
        let body = format!(
            "{}\n\n{}",
            r#"{
  "source_presets" : [
    { "name": "mine", "url": "https://example.com/data.csv" }
  ],
  "analyst": { "name": "Frederick", "username": "m319b4ky1553", "email": "m319b4ky1553@bangkit.academy" }
}"#,
            CONFIG_SYNTAX
        );
        fs::write(dir.join("bro.config"), body).unwrap();
        let config = load_config(&dir).unwrap();
        assert_eq!(config.source_presets[0].name, "mine");
        assert_eq!(config.analyst.name, "Frederick");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn older_configs_without_an_analyst_block_still_parse() {
        let dir = scratch_dir("partial");
        fs::write(
            dir.join("bro.config"),
            r#"{ "source_presets" : [] }"#,
        )
        .unwrap();
        let config = load_config(&dir).unwrap();
        assert!(config.source_presets.is_empty());
        assert!(config.analyst.email.is_empty());
        let _ = fs::remove_dir_all(&dir);
    }
}
