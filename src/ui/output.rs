use colored::*;
use serde_json::Value;
use tempshop::notifications::Notification;

/// Display any payload as indented JSON
pub fn display_value(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(pretty) => println!("{}", pretty),
        Err(_) => println!("{}", value),
    }
}

/// Display a product or category listing, one row per item
pub fn display_listing(title: &str, value: &Value) {
    let Some(items) = value.as_array() else {
        display_value(value);
        return;
    };

    println!("{}", format!("{} ({})", title, items.len()).bold());
    for item in items {
        let id = item.get("id").map(|v| v.to_string()).unwrap_or_default();
        let name = item
            .get("name")
            .or_else(|| item.get("title"))
            .and_then(Value::as_str)
            .unwrap_or("-");
        match item.get("price") {
            Some(price) => println!(
                "  {} {} {}",
                format!("#{}", id).dimmed(),
                name,
                price.to_string().trim_matches('"').green()
            ),
            None => println!("  {} {}", format!("#{}", id).dimmed(), name),
        }
    }
}

/// Display notifications, newest first, unread ones highlighted
pub fn display_notifications(notifications: &[Notification]) {
    if notifications.is_empty() {
        println!("{}", "No notifications.".dimmed());
        return;
    }

    for notification in notifications {
        let marker = if notification.read { " " } else { "●" };
        println!(
            "{} {} {}",
            marker.cyan(),
            notification.title.bold(),
            notification
                .timestamp
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .dimmed()
        );
        println!("    {}", notification.message);
    }
}

pub fn display_error(error: &dyn std::fmt::Display) {
    eprintln!("{} {}", "Error:".red(), error);
}
