// dataset_manager.rs
use crate::config::load_config;
use crate::order_loader::{fetch_csv_text, load_from_path, load_from_reader, OrderBook};
use crate::user_experience::handle_cancel_flag;
use crate::user_interaction::{
    get_user_input, get_user_input_level_2, print_insight, print_insight_level_2, print_list,
};
use chrono::{DateTime, Local};
use fuzzywuzzy::fuzz;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::SystemTime;

pub fn open_dataset_file(dash_db_path: &PathBuf) -> Option<(OrderBook, PathBuf)> {
    fn list_csv_files(path: &PathBuf) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("csv") {
                files.push(path);
            }
        }
        Ok(files)
    }

    fn open_book(file_path: PathBuf) -> Option<(OrderBook, PathBuf)> {
        if let Some(file_name) = file_path.file_name().and_then(|n| n.to_str()) {
            print_insight(&format!("Opening {}", file_name));
        }
        match load_from_path(&file_path) {
            Ok(book) => Some((book, file_path)),
            Err(error) => {
                print_insight(&format!("{}", error));
                None
            }
        }
    }

    match list_csv_files(dash_db_path) {
        Ok(mut files) => {
            if files.is_empty() {
                print_insight("No files in sight, bro.");
                return None;
            }

            files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

            // Collect file names into a Vec<&str>
            let file_names: Vec<String> = files
                .iter()
                .filter_map(|file| file.file_name()?.to_str().map(String::from))
                .collect();

            let mut file_name_slices: Vec<&str> = file_names.iter().map(AsRef::as_ref).collect();
            file_name_slices.push("BACK");
            print_list(&file_name_slices);

            let choice = get_user_input("What's it gonna be?: ").to_lowercase();

            // Assuming 'back' is always the last option
            let back_option_number = file_name_slices.len();

            if choice.parse::<usize>().ok() == Some(back_option_number) {
                print_insight("Bailed on that. Heading back to the last menu, bro.");
                return None;
            }

            // Fuzzy match logic for 'back'
            let options = &["back"];
            let mut highest_score = 0;
            let mut best_match = "";

            for &option in options {
                let score = fuzz::ratio(&choice, option);
                if score > highest_score {
                    highest_score = score;
                    best_match = option;
                }
            }

            // Check if the best match is 'back' with a score above 60
            if best_match == "back" && highest_score > 60 {
                print_insight("Bailed on that. Heading back to the last menu, bro.");
                return None;
            }

            match choice.parse::<usize>() {
                Ok(serial) if serial > 0 && serial <= files.len() => {
                    let file_path = files[serial - 1].clone();
                    if file_path.is_file() {
                        return open_book(file_path);
                    }
                }
                _ => (),
            }

            // Fuzzy search and opening logic
            let best_match_result = files
                .iter()
                .filter_map(|path| {
                    path.file_name()
                        .and_then(|n| n.to_str())
                        .map(|name| (path.clone(), fuzz::ratio(&choice, name)))
                })
                .max_by_key(|&(_, score)| score);

            if let Some((best_match, _)) = best_match_result {
                if best_match.is_file() {
                    return open_book(best_match);
                }
            }

            print_insight("No matching file found.");
        }
        Err(_) => {
            print_insight("Failed to read the directory.");
        }
    }
    None
}

pub fn delete_dataset_file(dash_db_path: &PathBuf) {
    fn list_csv_files(path: &PathBuf) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("csv") {
                files.push(path);
            }
        }
        Ok(files)
    }

    match list_csv_files(dash_db_path) {
        Ok(mut files) => {
            if files.is_empty() {
                print_insight("No files in sight, bro.");
                return;
            }

            files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

            let file_names: Vec<String> = files
                .iter()
                .filter_map(|file| file.file_name()?.to_str().map(String::from))
                .collect();

            let mut file_name_slices: Vec<&str> = file_names.iter().map(AsRef::as_ref).collect();
            file_name_slices.push("BACK");

            print_list(&file_name_slices);

            let choice = get_user_input("Punch in the serial number or a slice of the file name to DELETE, or hit 'back' to bail.\nWhat's it gonna be?: ")
    .trim().to_lowercase();

            // Assuming 'back' is always the last option
            let back_option_serial = file_name_slices.len();

            if choice
                .parse::<usize>()
                .ok()
                .map_or(false, |num| num == back_option_serial)
            {
                print_insight("Bailed on that. Heading back to the last menu, bro.");
                return;
            } else {
                // Fuzzy match logic for 'back'
                let options = &["back"];
                let mut highest_score = 0;
                let mut best_match = "";

                for &option in options {
                    let score = fuzz::ratio(&choice, option);
                    if score > highest_score {
                        highest_score = score;
                        best_match = option;
                    }
                }

                // Check if the best match is 'back' with a score above 60
                if best_match == "back" && highest_score > 60 {
                    print_insight("Bailed on that. Heading back to the last menu, bro.");
                    return;
                }
            }

            let mut file_deleted = false;

            match choice.parse::<usize>() {
                Ok(serial) if serial > 0 && serial <= files.len() => {
                    let file_path = &files[serial - 1];
                    if file_path.is_file() {
                        if let Some(file_name) = file_path.file_name().and_then(|n| n.to_str()) {
                            print_insight_level_2(&format!("Deleting {}", file_name));
                            if let Err(e) = fs::remove_file(file_path) {
                                print_insight(&format!("Failed to delete file: {}", e));
                            } else {
                                print_insight("File deleted successfully.");
                                file_deleted = true;
                            }
                        }
                    }
                }
                _ => (),
            }

            // Proceed to fuzzy search only if no file was deleted by index
            if !file_deleted {
                let best_match_result = files
                    .iter()
                    .filter_map(|path| {
                        path.file_name()
                            .and_then(|n| n.to_str())
                            .map(|name| (path, fuzz::ratio(&choice, name)))
                    })
                    .max_by_key(|&(_, score)| score);

                if let Some((best_match, _)) = best_match_result {
                    if best_match.is_file() {
                        if let Some(file_name) = best_match.file_name().and_then(|n| n.to_str()) {
                            print_insight_level_2(&format!("Deleting {}", file_name));
                            if let Err(e) = fs::remove_file(best_match) {
                                print_insight(&format!("Failed to delete file: {}", e));
                            } else {
                                print_insight("File deleted successfully.");
                            }
                        }
                    }
                } else {
                    print_insight("No matching file found for deletion.");
                }
            }
        }
        Err(_) => {
            print_insight("Failed to read the directory.");
        }
    }
}

pub fn import(desktop_path: &PathBuf, downloads_path: &PathBuf) -> Option<OrderBook> {
    fn system_time_to_date_time(system_time: SystemTime) -> DateTime<Local> {
        let datetime: DateTime<Local> = system_time.into();
        datetime
    }

    fn list_files(path: &PathBuf) -> io::Result<Vec<(PathBuf, SystemTime)>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() {
                if let Some(extension) = path.extension().and_then(|s| s.to_str()) {
                    if extension == "csv" {
                        if let Ok(metadata) = entry.metadata() {
                            if let Ok(modified) = metadata.modified() {
                                files.push((path, modified));
                            }
                        }
                    }
                }
            }
        }
        Ok(files)
    }

    let mut files = list_files(desktop_path).unwrap_or_default();
    files.extend(list_files(downloads_path).unwrap_or_default());

    // Most recently modified first
    files.sort_by(|a, b| b.1.cmp(&a.1));

    let mut file_infos: Vec<String> = Vec::new();

    for (file, modified_date) in files.iter() {
        let formatted_date = system_time_to_date_time(*modified_date)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        if let Some(file_name) = file.file_name().and_then(|n| n.to_str()) {
            let file_info = format!("{} (Modified: {})", file_name, formatted_date);
            file_infos.push(file_info);
        }
    }

    let mut file_info_slices: Vec<&str> = file_infos.iter().map(AsRef::as_ref).collect();
    file_info_slices.push("BACK");
    print_list(&file_info_slices);

    let choice = get_user_input("Enter the serial number of the file to open: ");

    let back_option_serial = file_info_slices.len();

    if choice
        .parse::<usize>()
        .ok()
        .map_or(false, |num| num == back_option_serial)
    {
        print_insight("Bailed on that. Heading back to the last menu, bro.");
        return None;
    } else {
        // Fuzzy match logic for 'back'
        let options = &["back"];
        let mut highest_score = 0;
        let mut best_match = "";

        for &option in options {
            let score = fuzz::ratio(&choice, option);
            if score > highest_score {
                highest_score = score;
                best_match = option;
            }
        }

        // Check if the best match is 'back' with a score above 60
        if best_match == "back" && highest_score > 60 {
            print_insight("Bailed on that. Heading back to the last menu, bro.");
            return None;
        }
    }

    if let Ok(serial) = choice.parse::<usize>() {
        if serial > 0 && serial <= files.len() {
            let (file_path, _) = &files[serial - 1];
            return match load_from_path(file_path) {
                Ok(book) => Some(book),
                Err(error) => {
                    print_insight(&format!("{}", error));
                    None
                }
            };
        }
    }

    print_insight("Invalid choice or file not accessible.");
    None
}

pub async fn fetch_from_url(dash_db_path: &PathBuf) -> Option<OrderBook> {
    let url = get_user_input_level_2("Enter the URL of the CSV export: ");
    if handle_cancel_flag(&url) {
        return None;
    }
    let url = url.trim().to_string();
    if url.is_empty() {
        print_insight("No URL, no dataset. Heading back.");
        return None;
    }
    fetch_and_offer_save(&url, dash_db_path).await
}

pub async fn fetch_from_preset(dash_db_path: &PathBuf) -> Option<OrderBook> {
    fn resolve_choice(options: &[String], input: &str) -> Option<usize> {
        // Direct Index Selection
        if let Ok(index) = input.parse::<usize>() {
            if index > 0 && index <= options.len() {
                return Some(index - 1);
            }
        }

        // Starts With Match
        if let Some(index) = options.iter().position(|option| option.starts_with(input)) {
            return Some(index);
        }

        // Existing Fuzzy Match Logic
        let (best_match_index, best_match_score) = options
            .iter()
            .enumerate()
            .map(|(index, option)| (index, fuzz::ratio(input, option)))
            .max_by_key(|&(_, score)| score)
            .unwrap_or((0, 0));

        if best_match_score < 60 {
            return None;
        }
        Some(best_match_index)
    }

    let presets = match load_config(dash_db_path) {
        Ok(config) => config.source_presets,
        Err(error) => {
            print_insight(&format!("Could not read the config: {}", error));
            return None;
        }
    };
    if presets.is_empty() {
        print_insight("No source presets in the config yet. Hit SETTINGS or @config to add some.");
        return None;
    }

    let mut options = presets
        .iter()
        .map(|preset| preset.name.to_lowercase())
        .collect::<Vec<_>>();
    options.push("back".to_string());
    let options_slices: Vec<&str> = options.iter().map(AsRef::as_ref).collect();

    print_insight_level_2("Choose a source:");
    print_list(&options_slices);

    let input = get_user_input_level_2("Enter your choice: ").to_lowercase();

    let Some(index) = resolve_choice(&options, &input) else {
        print_insight("No matching option found.");
        return None;
    };
    if index >= presets.len() {
        print_insight("Bailed on that. Heading back to the last menu, bro.");
        return None;
    }

    let preset = presets[index].clone();
    fetch_and_offer_save(&preset.url, dash_db_path).await
}

async fn fetch_and_offer_save(url: &str, dash_db_path: &PathBuf) -> Option<OrderBook> {
    print_insight_level_2(&format!("Fetching {}", url));
    let body = match fetch_csv_text(url).await {
        Ok(body) => body,
        Err(error) => {
            print_insight(&format!("{}", error));
            return None;
        }
    };
    let book = match load_from_reader(body.as_bytes(), url) {
        Ok(book) => book,
        Err(error) => {
            print_insight(&format!("{}", error));
            return None;
        }
    };
    print_insight(&format!("Got {} order lines. Nice.", book.len()));

    let file_name =
        get_user_input_level_2("Enter file name to keep a copy in dash_db (@c to skip): ");
    if !handle_cancel_flag(&file_name) && !file_name.trim().is_empty() {
        let file_name = file_name.trim().to_string();
        let full_file_name = if file_name.ends_with(".csv") {
            file_name
        } else {
            format!("{}.csv", file_name)
        };
        let file_path = dash_db_path.join(full_file_name);
        match fs::write(&file_path, &body) {
            Ok(_) => print_insight(&format!("CSV file saved at {}", file_path.display())),
            Err(error) => print_insight(&format!("Failed to save file: {}", error)),
        }
    }

    Some(book)
}
