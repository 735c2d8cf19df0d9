#![cfg(not(tarpaulin_include))]

use navstack::navigation::NavigationStack;
use navstack::saving::{load_stack, save_stack};
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

fn print_stack(nav: &NavigationStack) {
    if nav.is_empty() {
        println!("  (empty)");
        return;
    }
    for (i, entry) in nav.stack().iter().enumerate() {
        let marker = if i + 1 == nav.count() { '*' } else { ' ' };
        if entry.text.is_empty() {
            println!("{} {:>2}  {}", marker, i, entry.url);
        } else {
            println!("{} {:>2}  {}  [{}]", marker, i, entry.url, entry.text);
        }
    }
}

// Splits "<url> [text]" into url and optional label
fn url_and_text(args: &str) -> (&str, &str) {
    match args.split_once(char::is_whitespace) {
        Some((url, text)) => (url, text.trim()),
        None => (args, ""),
    }
}

/// Execute one command line and return the new status text
fn execute(nav: &mut NavigationStack, command: &str, show: &mut bool) -> String {
    let (name, args) = match command.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (command, ""),
    };

    match name {
        "start" => {
            let (url, text) = url_and_text(args);
            match nav.add_start_url(url, text, "") {
                Ok(()) => String::from("ok"),
                Err(e) => e.to_string(),
            }
        }
        "add" => {
            let (url, text) = url_and_text(args);
            match nav.add_url(url, text, "") {
                Ok(true) => String::from("ok"),
                Ok(false) => String::from("unchanged"),
                Err(e) => e.to_string(),
            }
        }
        "back" => match nav.delete_last_url() {
            Some(entry) => format!("left {}", entry.url),
            None => String::from("at start"),
        },
        "current" => match nav.url() {
            Ok(url) => url.to_string(),
            Err(e) => e.to_string(),
        },
        "prev" => match nav.previous_url() {
            Ok(url) => url.to_string(),
            Err(e) => e.to_string(),
        },
        "entry" => match args.parse::<usize>() {
            Ok(index) => match nav.stack_entry_url(index) {
                Ok(url) => url.to_string(),
                Err(e) => e.to_string(),
            },
            Err(_) => String::from("invalid index"),
        },
        "clear" => {
            nav.clear();
            String::from("ok")
        }
        "save" if !args.is_empty() => match save_stack(nav, Path::new(args)) {
            Ok(()) => String::from("ok"),
            Err(e) => e.to_string(),
        },
        "load" if !args.is_empty() => match load_stack(Path::new(args)) {
            Ok(loaded) => {
                *nav = loaded;
                String::from("ok")
            }
            Err(e) => e.to_string(),
        },
        "disable_output" => {
            *show = false;
            String::from("ok")
        }
        "enable_output" => {
            *show = true;
            String::from("ok")
        }
        _ => String::from("invalid command"),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut nav = NavigationStack::new();
    let mut status = String::from("ok");
    let mut show = true;
    let mut start_time = Instant::now();

    loop {
        if show {
            print_stack(&nav);
        }

        let elapsed_time = start_time.elapsed().as_secs_f64();
        print!("[{:.1}] ({}) > ", elapsed_time, status);
        io::stdout().flush()?;

        let mut command = String::new();
        if io::stdin().read_line(&mut command)? == 0 {
            break;
        }
        let command = command.trim();
        start_time = Instant::now();

        if command.is_empty() {
            status = String::from("invalid command");
            continue;
        }

        if command == "q" {
            break;
        }

        if command == "help" {
            println!("Commands:");
            println!("  q: Quit");
            println!("  start <url> [text]: Start a new navigation with the url");
            println!("  add <url> [text]: Add a url to the navigation");
            println!("  back: Remove the current url");
            println!("  current: Show the current url");
            println!("  prev: Show the previous url");
            println!("  entry <index>: Show the url at a position");
            println!("  clear: Empty the navigation");
            println!("  save <file>, load <file>: Store or restore the navigation");
            println!("  disable_output, enable_output: Toggle the stack display");
            continue;
        }

        status = execute(&mut nav, command, &mut show);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_drive_the_stack() {
        let mut nav = NavigationStack::new();
        let mut show = true;

        assert_eq!(execute(&mut nav, "start https://x/a Home", &mut show), "ok");
        assert_eq!(execute(&mut nav, "add https://x/b Detail view", &mut show), "ok");
        assert_eq!(nav.stack()[1].text, "Detail view");
        assert_eq!(execute(&mut nav, "add https://x/b", &mut show), "unchanged");
        assert_eq!(execute(&mut nav, "prev", &mut show), "https://x/a");
        assert_eq!(execute(&mut nav, "entry 1", &mut show), "https://x/b");
        assert_eq!(execute(&mut nav, "back", &mut show), "left https://x/b");
        assert_eq!(execute(&mut nav, "back", &mut show), "at start");
        assert_eq!(execute(&mut nav, "current", &mut show), "https://x/a");
    }

    #[test]
    fn errors_become_status_text() {
        let mut nav = NavigationStack::new();
        let mut show = true;

        assert!(execute(&mut nav, "add https://x/<a>", &mut show).contains("Invalid characters"));
        assert_eq!(execute(&mut nav, "current", &mut show), "No url within the navigation stack");
        assert_eq!(execute(&mut nav, "entry x", &mut show), "invalid index");
        assert_eq!(execute(&mut nav, "frobnicate", &mut show), "invalid command");
        assert_eq!(execute(&mut nav, "disable_output", &mut show), "ok");
        assert!(!show);
    }
}
