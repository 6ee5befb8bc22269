use console::Style;

pub fn print_header(title: &str) {
    println!("\n{}", Style::new().bold().cyan().apply_to(title));
    println!(
        "{}",
        Style::new().dim().apply_to("─".repeat(title.chars().count()))
    );
}

pub fn print_success(msg: &str) {
    println!("{} {}", Style::new().green().bold().apply_to("SUCCESS:"), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", Style::new().red().bold().apply_to("ERROR:"), msg);
}

pub fn print_panel(title: &str, content: &str, border_color: Style, content_style: Option<Style>) {
    let width: usize = 80;
    let padding = width.saturating_sub(console::measure_text_width(title) + 5);

    println!(
        "{} {} {}",
        border_color.apply_to("┌─"),
        Style::new().bold().apply_to(title),
        border_color.apply_to(format!("{}┐", "─".repeat(padding)))
    );

    let content_style = content_style.unwrap_or_else(Style::new);
    for line in content.lines() {
        for wrapped in textwrap::wrap(line, width - 4) {
            let space = (width - 4).saturating_sub(console::measure_text_width(&wrapped));
            println!(
                "{} {} {}{}",
                border_color.apply_to("│"),
                content_style.apply_to(&wrapped),
                " ".repeat(space),
                border_color.apply_to("│")
            );
        }
    }
    println!("{}", border_color.apply_to(format!("└{}┘", "─".repeat(width - 2))));
}

pub fn print_key_value(key: &str, value: &str) {
    println!(
        "{}: {}",
        Style::new().dim().apply_to(key),
        Style::new().bold().apply_to(value)
    );
}
