use crate::output::is_quiet;
use crate::session::{ScannedCode, Session};
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", Icons::QR, text.style(theme().header.clone()));
}

pub fn banner(title: &str, subtitle: &str) {
    if is_quiet() {
        return;
    }
    println!();
    println!("{} {}", Icons::QR, title.style(theme().header.clone()));
    println!("  {}", subtitle.style(theme().dim.clone()));
    println!();
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().error.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().warn.clone()));
}

pub fn info(label: &str, value: &str) {
    println!("{} {}: {}", Icons::INFO, label.style(theme().dim.clone()), value);
}

pub fn section(title: &str) {
    if is_quiet() {
        return;
    }
    println!();
    println!("━{}━", title.style(theme().header.clone()));
}

pub fn dim(text: &str) -> String {
    text.style(theme().dim.clone()).to_string()
}

pub fn session_line(session: &Session, codes: usize) {
    println!(
        "{} {}  {}  {}",
        Icons::FOLDER,
        session.name.style(theme().header.clone()),
        dim(&format!("{} code(s)", codes)),
        session.id.style(theme().accent.clone())
    );
}

pub fn code_line(code: &ScannedCode) {
    if code.is_link() {
        println!("  {} {}", Icons::LINK, code.text.style(theme().link.clone()));
    } else {
        println!("  {} {}", Icons::TEXT, code.text);
    }
}
