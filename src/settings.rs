// settings.rs
use crate::config::{ensure_config_file, Analyst, Config, SourcePreset, CONFIG_SYNTAX};
use crate::user_experience::{handle_back_flag, handle_cancel_flag, handle_quit_flag};
use crate::user_interaction::{
    determine_action_as_number, determine_action_as_text, get_edited_user_json_input,
    get_user_input, get_user_input_level_2, print_insight, print_insight_level_2, print_list,
    print_list_level_2,
};
use std::env;
use std::error::Error;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Read-modify-write on bro.config. The closure gets the parsed config, and
/// whatever it leaves behind is what lands back on disk, syntax tail included.
pub fn manage_config_file<F>(operation: F) -> Result<(), Box<dyn Error>>
where
    F: FnOnce(&mut Config) -> Result<(), Box<dyn Error>>,
{
    let home_dir = match env::var("HOME") {
        Ok(home) => home,
        Err(_) => match env::var("USERPROFILE") {
            Ok(userprofile) => userprofile,
            Err(_) => {
                eprintln!("Unable to determine user home directory.");
                std::process::exit(1);
            }
        },
    };
    let desktop_path = Path::new(&home_dir).join("Desktop");
    let dash_db_path = desktop_path.join("dash_db");

    if !dash_db_path.exists() {
        std::fs::create_dir_all(&dash_db_path)?;
    }

    let file_path = ensure_config_file(&dash_db_path)?;

    let mut contents = String::new();
    File::open(&file_path)?.read_to_string(&mut contents)?;

    let json_part = contents.split("SYNTAX").next().unwrap_or_default();
    let mut config: Config = if json_part.trim().is_empty() {
        Config::default()
    } else {
        serde_json::from_str(json_part)?
    };

    operation(&mut config)?;

    let serialized = serde_json::to_string_pretty(&config)?;
    let mut file = File::create(&file_path)?;
    file.write_all(format!("{}\n\n{}", serialized, CONFIG_SYNTAX).as_bytes())?;

    Ok(())
}

pub fn open_settings() -> Result<(), Box<dyn Error>> {
    loop {
        print_insight("Decision time! What are you vibing with?");
        let menu_options = vec!["source presets", "analyst block", "back"];
        print_list(&menu_options);
        let choice = get_user_input("Your move: ").to_lowercase();

        if handle_back_flag(&choice) {
            break;
        }
        let _ = handle_quit_flag(&choice);

        let selected_option = determine_action_as_text(&menu_options, &choice);

        match selected_option {
            Some(ref action) if action == "source presets" => {
                source_presets_menu()?;
            }
            Some(ref action) if action == "analyst block" => {
                analyst_menu()?;
            }
            Some(ref action) if action == "back" => {
                break;
            }
            _ => {
                print_insight("Dude, that action's a no-go. Give it another whirl, alright?");
            }
        }
    }
    Ok(())
}

fn source_presets_menu() -> Result<(), Box<dyn Error>> {
    loop {
        let menu_options = vec![
            "add source preset",
            "update source preset",
            "delete source preset",
            "view source presets",
        ];
        print_list(&menu_options);
        let choice = get_user_input_level_2("Enter your choice: ").to_lowercase();

        if handle_back_flag(&choice) {
            break;
        }
        let _ = handle_quit_flag(&choice);

        let selected_option = determine_action_as_number(&menu_options, &choice);

        match selected_option {
            Some(1) => {
                add_source_preset()?;
                continue;
            }
            Some(2) => {
                update_source_preset()?;
                continue;
            }
            Some(3) => {
                delete_source_preset()?;
                continue;
            }
            Some(4) => {
                view_source_presets()?;
                continue;
            }
            _ => {
                println!("Invalid option. Please enter a number from 1 to 4.");
                continue;
            }
        }
    }
    Ok(())
}

fn add_source_preset() -> Result<(), Box<dyn Error>> {
    let blank = SourcePreset {
        name: String::new(),
        url: String::new(),
    };
    let preset_json = serde_json::to_string_pretty(&blank)?;
    let edited = get_edited_user_json_input(preset_json);
    if handle_cancel_flag(&edited) {
        return Ok(());
    }

    let preset: SourcePreset = serde_json::from_str(&edited)?;
    if preset.name.trim().is_empty() || preset.url.trim().is_empty() {
        print_insight_level_2("A preset needs both a name and a url, bro.");
        return Ok(());
    }

    manage_config_file(|config| {
        config.source_presets.push(preset);
        Ok(())
    })?;
    print_insight_level_2("Preset added.");
    Ok(())
}

fn update_source_preset() -> Result<(), Box<dyn Error>> {
    let mut presets = Vec::new();
    manage_config_file(|config| {
        presets = config.source_presets.clone();
        Ok(())
    })?;

    if presets.is_empty() {
        print_insight_level_2("No presets to update yet.");
        return Ok(());
    }

    let formatted_presets: Vec<String> = presets
        .iter()
        .map(|preset| format!("{} => {}", preset.name, preset.url))
        .collect();
    print_list_level_2(&formatted_presets);

    let input = get_user_input_level_2("Enter the name or number of the preset to update: ");
    if handle_cancel_flag(&input) {
        return Ok(());
    }

    let Some(index) = locate_preset(&presets, &input) else {
        print_insight_level_2("No such preset, bro.");
        return Ok(());
    };

    let preset_json = serde_json::to_string_pretty(&presets[index])?;
    let edited = get_edited_user_json_input(preset_json);
    if handle_cancel_flag(&edited) {
        return Ok(());
    }
    let updated: SourcePreset = serde_json::from_str(&edited)?;

    manage_config_file(move |config| {
        if let Some(slot) = config.source_presets.get_mut(index) {
            *slot = updated;
        }
        Ok(())
    })?;
    print_insight_level_2("Preset updated.");
    Ok(())
}

fn delete_source_preset() -> Result<(), Box<dyn Error>> {
    let mut presets = Vec::new();
    manage_config_file(|config| {
        presets = config.source_presets.clone();
        Ok(())
    })?;

    if presets.is_empty() {
        print_insight_level_2("No presets to delete.");
        return Ok(());
    }

    let formatted_presets: Vec<String> = presets
        .iter()
        .map(|preset| format!("{} => {}", preset.name, preset.url))
        .collect();
    print_list_level_2(&formatted_presets);

    let input = get_user_input_level_2("Enter the name or number of the preset to delete: ");
    if handle_cancel_flag(&input) {
        return Ok(());
    }

    let Some(index) = locate_preset(&presets, &input) else {
        print_insight_level_2("No such preset, bro.");
        return Ok(());
    };

    manage_config_file(move |config| {
        if index < config.source_presets.len() {
            config.source_presets.remove(index);
        }
        Ok(())
    })?;
    print_insight_level_2("Preset deleted.");
    Ok(())
}

fn view_source_presets() -> Result<(), Box<dyn Error>> {
    let mut presets = Vec::new();
    manage_config_file(|config| {
        presets = config.source_presets.clone();
        Ok(())
    })?;

    if presets.is_empty() {
        print_insight_level_2("No source presets configured yet.");
        return Ok(());
    }

    let formatted_presets: Vec<String> = presets
        .iter()
        .map(|preset| format!("{} => {}", preset.name, preset.url))
        .collect();
    print_list_level_2(&formatted_presets);
    Ok(())
}

fn analyst_menu() -> Result<(), Box<dyn Error>> {
    loop {
        let menu_options = vec![
            "update analyst block",
            "view analyst block",
            "clear analyst block",
        ];
        print_list(&menu_options);
        let choice = get_user_input_level_2("Enter your choice: ").to_lowercase();

        if handle_back_flag(&choice) {
            break;
        }
        let _ = handle_quit_flag(&choice);

        let selected_option = determine_action_as_number(&menu_options, &choice);

        match selected_option {
            Some(1) => {
                update_analyst_block()?;
                continue;
            }
            Some(2) => {
                view_analyst_block()?;
                continue;
            }
            Some(3) => {
                clear_analyst_block()?;
                continue;
            }
            _ => {
                println!("Invalid option. Please enter a number from 1 to 3.");
                continue;
            }
        }
    }
    Ok(())
}

fn update_analyst_block() -> Result<(), Box<dyn Error>> {
    let mut analyst = Analyst::default();
    manage_config_file(|config| {
        analyst = config.analyst.clone();
        Ok(())
    })?;

    let analyst_json = serde_json::to_string_pretty(&analyst)?;
    let edited = get_edited_user_json_input(analyst_json);
    if handle_cancel_flag(&edited) {
        return Ok(());
    }
    let updated: Analyst = serde_json::from_str(&edited)?;

    manage_config_file(move |config| {
        config.analyst = updated;
        Ok(())
    })?;
    print_insight_level_2("Analyst block updated.");
    Ok(())
}

fn view_analyst_block() -> Result<(), Box<dyn Error>> {
    let mut analyst = Analyst::default();
    manage_config_file(|config| {
        analyst = config.analyst.clone();
        Ok(())
    })?;

    let formatted: Vec<String> = vec![
        format!("name     => {}", analyst.name),
        format!("username => {}", analyst.username),
        format!("email    => {}", analyst.email),
    ];
    print_list_level_2(&formatted);
    Ok(())
}

fn clear_analyst_block() -> Result<(), Box<dyn Error>> {
    manage_config_file(|config| {
        config.analyst = Analyst::default();
        Ok(())
    })?;
    print_insight_level_2("Analyst block cleared.");
    Ok(())
}

fn locate_preset(presets: &[SourcePreset], input: &str) -> Option<usize> {
    let trimmed = input.trim();
    if let Ok(number) = trimmed.parse::<usize>() {
        if number > 0 && number <= presets.len() {
            return Some(number - 1);
        }
        return None;
    }
    presets
        .iter()
        .position(|preset| preset.name.eq_ignore_ascii_case(trimmed))
}
