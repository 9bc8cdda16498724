//! Interactive scan console.
//!
//! Drives a full kiosk session from stdin, one completed code per line, the
//! same way the serial listener delivers frames on the cabinet. Button words
//! stand in for the physical panel so every mode is reachable.

use std::io::{self, BufRead};

use anyhow::Result;
use mart_core::{Catalog, GameButton, GameClock, InputEvent, Kiosk, KioskConfig, Mode, ScanOutcome};
use owo_colors::OwoColorize;

pub fn run(catalog: Catalog, config: KioskConfig, learning: bool) -> Result<()> {
    println!("Astrid Mart {} - Scan Console", env!("CARGO_PKG_VERSION"));
    println!("Type a barcode or shortcut digit and press Enter. 'help' lists commands.");
    println!();

    let mut kiosk = Kiosk::new(catalog, config);
    let clock = GameClock::new();
    if learning {
        kiosk.start_learning();
    } else {
        kiosk.start_retail();
    }
    print_prompt(&kiosk);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();
        let now = clock.now_ms();

        match input {
            "" => {}
            "quit" | "q" => break,
            "help" => print_help(),
            "green" => press(&mut kiosk, GameButton::Green, now),
            "blue" => press(&mut kiosk, GameButton::Blue, now),
            "yellow" => press(&mut kiosk, GameButton::Yellow, now),
            "red" => press(&mut kiosk, GameButton::Red, now),
            code => match kiosk.submit_code(code, now) {
                Some(outcome) => print_outcome(&outcome),
                None => println!("{}", "No scanning mode active here.".yellow()),
            },
        }

        if !kiosk.is_running() {
            break;
        }
        print_prompt(&kiosk);
    }

    println!("Bye!");
    Ok(())
}

fn press(kiosk: &mut Kiosk, button: GameButton, now: u64) {
    kiosk.handle_event(InputEvent::Button(button), now);
    if !kiosk.status().is_empty() {
        println!("{}", kiosk.status());
    }
}

fn print_outcome(outcome: &ScanOutcome) {
    match outcome {
        ScanOutcome::CoolingDown => println!("{}", "(cooldown, scan ignored)".dimmed()),
        ScanOutcome::Added { .. } | ScanOutcome::Correct { .. } => {
            if let Some(message) = outcome.message() {
                println!("{}", message.green());
            }
        }
        ScanOutcome::NotFound { .. } => {
            if let Some(message) = outcome.message() {
                println!("{}", message.red());
            }
        }
        ScanOutcome::Wrong { .. } | ScanOutcome::Unrecognized => {
            if let Some(message) = outcome.message() {
                println!("{}", message.yellow());
            }
        }
    }
}

fn print_prompt(kiosk: &Kiosk) {
    match kiosk.mode() {
        Mode::Retail => {
            println!(
                "[retail] {} items, total {}",
                kiosk.cart().item_count(),
                format!("€{:.2}", kiosk.cart().total()).bold()
            );
        }
        Mode::Learning => {
            if let Some(target) = kiosk.learning().current_target() {
                println!(
                    "[learning] find: {}  ({}/{})",
                    target.name.bold(),
                    kiosk.learning().attempted(),
                    kiosk.learning().total()
                );
            }
        }
        Mode::Complete => {
            println!(
                "[done] score: {} of {} - press 'red' for the menu",
                kiosk.learning().correct().to_string().green(),
                kiosk.learning().total()
            );
        }
        Mode::Payment(step) => {
            println!("[payment:{}] 'blue' continues, 'red' cancels", step);
        }
        Mode::Menu => {
            println!("[menu] green=retail blue=learning yellow=manager red=quit");
        }
        Mode::Manager => {
            println!("[manager] 'red' returns to the menu");
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  <code>    submit a barcode or single-digit shortcut");
    println!("  green     start button (retail / checkout)");
    println!("  blue      action button (learning / remove item / payment step)");
    println!("  yellow    utility button (manager / clear cart)");
    println!("  red       back / quit");
    println!("  quit, q   exit the console");
}
