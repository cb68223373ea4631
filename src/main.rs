use dashbro::config::edit_config;
use dashbro::dashboard_manager::launch_dashboard;
use dashbro::dataset_manager::{
    delete_dataset_file, fetch_from_preset, fetch_from_url, import, open_dataset_file,
};
use dashbro::settings::open_settings;
use dashbro::user_experience::{handle_quit_flag, handle_special_flag_without_dataset};
use dashbro::user_interaction::{
    determine_action_as_text, get_user_input, print_insight, print_list,
};
use std::env;
use std::path::Path;
use std::path::PathBuf;

const BRO_VERSION: &str = "1.2.0";

#[tokio::main]
async fn main() {
    fn set_up_directory_system() -> Result<(String, String, String), Box<dyn std::error::Error>> {
        let home_dir = match env::var("HOME") {
            Ok(home) => home,
            Err(_) => env::var("USERPROFILE")?,
        };
        let desktop_path = Path::new(&home_dir).join("Desktop");
        let downloads_path = Path::new(&home_dir).join("Downloads");
        let dash_db_path = desktop_path.join("dash_db");

        if !dash_db_path.exists() {
            std::fs::create_dir_all(&dash_db_path)?;
        }

        Ok((
            desktop_path.to_string_lossy().into_owned(),
            downloads_path.to_string_lossy().into_owned(),
            dash_db_path.to_string_lossy().into_owned(),
        ))
    }

    env_logger::init();

    if std::env::args().any(|arg| arg == "--version") {
        print_insight(BRO_VERSION);
        std::process::exit(0);
    }

    let (desktop_path, downloads_path, dash_db_path) =
        set_up_directory_system().expect("Failed to set up directory system");

    let dash_db_path_buf = PathBuf::from(dash_db_path);
    let desktop_path_buf = PathBuf::from(desktop_path);
    let downloads_path_buf = PathBuf::from(downloads_path);

    println!(
        r#"

 ____      _     ____   _   _  ____   ____    ___
|  _ \    / \   / ___| | | | || __ ) |  _ \  / _ \
| | | |  / _ \  \___ \ | |_| ||  _ \ | |_) || | | |
| |_| | / ___ \  ___) ||  _  || |_) ||  _ < | |_| |
|____/ /_/   \_\|____/ |_| |_||____/ |_| \_\ \___/

====================================================================================================

                 Date-range dashboards for your order exports, right in the terminal.

"#
    );

    let menu_options = vec![
        "OPEN (FROM DASH_DB)",
        "IMPORT (FROM LOCAL FILE SYSTEM)",
        "FETCH (FROM URL)",
        "FETCH (FROM PRESET)",
        "DELETE",
        "SETTINGS",
        "CONFIG",
    ];

    loop {
        print_list(&menu_options);
        let choice = get_user_input("Your move, bro: ");
        let _ = handle_quit_flag(&choice);
        let special_flag_invoked = handle_special_flag_without_dataset(&choice);

        let selected_option = determine_action_as_text(&menu_options, &choice);

        if !special_flag_invoked {
            match selected_option {
                Some(ref action) if action == "OPEN (FROM DASH_DB)" => {
                    match open_dataset_file(&dash_db_path_buf) {
                        Some((book, _file_path)) => {
                            if let Err(e) = launch_dashboard(book).await {
                                println!("Error during dashboard session: {}", e);
                            }
                        }
                        None => continue,
                    }
                }
                Some(ref action) if action == "IMPORT (FROM LOCAL FILE SYSTEM)" => {
                    match import(&desktop_path_buf, &downloads_path_buf) {
                        Some(book) => {
                            if let Err(e) = launch_dashboard(book).await {
                                println!("Error during dashboard session: {}", e);
                            }
                        }
                        None => continue,
                    }
                }
                Some(ref action) if action == "FETCH (FROM URL)" => {
                    match fetch_from_url(&dash_db_path_buf).await {
                        Some(book) => {
                            if let Err(e) = launch_dashboard(book).await {
                                println!("Error during dashboard session: {}", e);
                            }
                        }
                        None => continue,
                    }
                }
                Some(ref action) if action == "FETCH (FROM PRESET)" => {
                    match fetch_from_preset(&dash_db_path_buf).await {
                        Some(book) => {
                            if let Err(e) = launch_dashboard(book).await {
                                println!("Error during dashboard session: {}", e);
                            }
                        }
                        None => continue,
                    }
                }
                Some(ref action) if action == "DELETE" => {
                    delete_dataset_file(&dash_db_path_buf);
                    continue;
                }
                Some(ref action) if action == "SETTINGS" => {
                    if let Err(e) = open_settings() {
                        println!("Error in settings: {}", e);
                    }
                    continue;
                }
                Some(ref action) if action == "CONFIG" => {
                    let _ = edit_config(&dash_db_path_buf);
                    continue;
                }
                _ => {
                    print_insight("Dude, that action's a no-go. Give it another whirl, alright?");
                }
            }
        }
    }
}
