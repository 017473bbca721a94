// src/ui.rs

use crate::{
    constants, symbols,
    models::Thumbnail,
    thumbnail::ThumbnailView,
    utils,
};
use colored::*;
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use std::{
    io::{self, Write},
    time::Duration,
};

pub fn box_message(title: &str, content: &[&str], color_func: fn(ColoredString) -> ColoredString) {
    println!("\n┌{}┐", "─".repeat(constants::UI_WIDTH - 2));
    println!("  {}", color_func(title.bold()));
    println!("├{}┤", "─".repeat(constants::UI_WIDTH - 2));
    for line in content {
        println!("  {}", line);
    }
    println!("└{}┘", "─".repeat(constants::UI_WIDTH - 2));
}

pub fn info(message: &str) {
    println!("{} {}", *symbols::INFO, message);
}

pub fn warn(message: &str) {
    eprintln!("{} {}", *symbols::WARN, message.yellow());
}

pub fn error(message: &str) {
    eprintln!("{} {}", *symbols::ERROR, message.red());
}

pub fn prompt(message: &str, default: Option<&str>) -> io::Result<String> {
    let default_str = default.map_or("".to_string(), |d| format!(" (默认: {})", d));
    print!("\n>>> {}{}: ", message, default_str);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim().to_string();
    if input.is_empty() {
        Ok(default.unwrap_or("").to_string())
    } else {
        Ok(input)
    }
}

pub fn confirm(question: &str, default_yes: bool) -> bool {
    let options = if default_yes { "(Y/n)" } else { "(y/N)" };
    loop {
        match prompt(&format!("{} {}", question, options), None) {
            Ok(choice) => {
                let choice = choice.to_lowercase();
                if choice == "y" {
                    return true;
                }
                if choice == "n" {
                    return false;
                }
                if choice.is_empty() {
                    return default_yes;
                }
                println!("{}", "无效输入，请输入 'y' 或 'n'。".red());
            }
            Err(_) => return false,
        }
    }
}

pub fn prompt_hidden(message: &str) -> io::Result<String> {
    print!("\n>>> {}: ", message);
    io::stdout().flush()?;
    rpassword::read_password()
}

/// 百分比进度条，对应下载时的进度对话框
pub fn new_percent_progress_bar(message: &str) -> ProgressBar {
    let pbar = ProgressBar::new(100);
    let style = ProgressStyle::with_template(
        "{prefix:.bold.cyan} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("#>-");
    pbar.set_style(style);
    pbar.set_prefix("下载");
    pbar.set_message(format!("{} (按 {} 取消)", message, *symbols::CTRL_C));
    pbar.enable_steady_tick(Duration::from_millis(100));
    pbar
}

/// 终端版的缩略图界面
pub struct ConsoleView {
    pbar: ProgressBar,
    unlinked: bool,
}

impl ConsoleView {
    pub fn new() -> Self {
        Self {
            pbar: new_percent_progress_bar("正在下载图片"),
            unlinked: false,
        }
    }

    pub fn was_unlinked(&self) -> bool {
        self.unlinked
    }
}

impl Default for ConsoleView {
    fn default() -> Self {
        Self::new()
    }
}

impl ThumbnailView for ConsoleView {
    fn show_progress(&mut self, percent: u8) {
        self.pbar.set_position(u64::from(percent));
    }

    fn dismiss_progress(&mut self) {
        self.pbar.finish_and_clear();
    }

    fn set_thumbnail(&mut self, slot: usize, thumbnail: &Thumbnail) {
        let name = utils::truncate_text(thumbnail.entry.file_name(), constants::FILENAME_TRUNCATE_LENGTH);
        let size = std::fs::metadata(&thumbnail.local_path)
            .map(|m| HumanBytes(m.len()).to_string())
            .unwrap_or_else(|_| "?".to_string());
        println!(
            "{} 槽位 {}: {} {}",
            *symbols::SLOT,
            slot + 1,
            name.bold(),
            format!("{}x{}, {}", thumbnail.width, thumbnail.height, size).dimmed()
        );
        println!(
            "    {} {}",
            "->".green(),
            dunce::simplified(&thumbnail.local_path).display()
        );
    }

    fn show_message(&mut self, message: &str) {
        error(message);
    }

    fn on_unlinked(&mut self) {
        self.unlinked = true;
    }
}
