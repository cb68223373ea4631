// src/user_experience.rs
use crate::config::edit_config;
use crate::dataset_manager::delete_dataset_file;
use crate::user_interaction::{print_insight, print_list};
use std::env;
use std::path::Path;
use std::path::PathBuf;

pub fn handle_special_flag_without_dataset(flag: &str) -> bool {
    let home_dir = match env::var("HOME") {
        Ok(dir) => dir,
        Err(_) => match env::var("USERPROFILE") {
            Ok(dir) => dir,
            Err(_) => {
                println!("Unable to determine user home directory");
                return false;
            }
        },
    };
    let desktop_path = Path::new(&home_dir).join("Desktop");
    let dash_db_path = desktop_path.join("dash_db");

    let dash_db_path_buf = PathBuf::from(dash_db_path.clone());

    match flag {
        "@f" | "@flags" => {
            let flags = vec![
                "@b           : Secondary menus => Back up one level",
                "@c           : After action select/ in vim edit => Cancel action",
                "@config      : Primary/ Secondary menu => Edit config",
                "@d / @delete : Primary/ Secondary menu => Delete files from dash_db",
                "@f / @flags  : Primary/ Secondary menu => View all flags",
                "@q           : Anywhere => Quit dashbro",
            ];

            print_insight("Serving your flags ...");
            print_list(&flags);
            println!();
            true
        }
        "@d" | "@delete" => {
            delete_dataset_file(&dash_db_path_buf);
            true
        }
        "@config" => {
            let _ = edit_config(&dash_db_path_buf);
            true
        }

        _ => false,
    }
}

pub fn handle_back_flag(flag: &str) -> bool {
    match flag {
        "@b" => true,
        _ => false,
    }
}

pub fn handle_quit_flag(flag: &str) {
    if flag == "@q" {
        std::process::exit(0);
    }
}

pub fn handle_cancel_flag(flag: &str) -> bool {
    let trimmed = flag.trim();
    match trimmed {
        f if f == "@c" => true,
        f if f.starts_with("@c") => true,
        _ => false,
    }
}
