use chrono::{Local, Utc};
use cityweather_core::{DisplayModel, DisplayOptions, Session, SessionState};
use tokio::sync::watch;

/// Redraw if the controller published anything since the last draw.
pub fn redraw(view: &mut watch::Receiver<Session>, options: &DisplayOptions) {
    if !view.has_changed().unwrap_or(false) {
        return;
    }

    let session = view.borrow_and_update().clone();
    draw(&session, options);
}

fn draw(session: &Session, options: &DisplayOptions) {
    match &session.state {
        SessionState::Idle => {}
        SessionState::Suggesting(candidates) if candidates.is_empty() => {
            println!("No suggestions for '{}'.", session.query.trim());
        }
        SessionState::Suggesting(_) => {}
        SessionState::Resolving(candidate) => {
            let label = candidate.label().unwrap_or_else(|| candidate.key());
            println!("Fetching weather for {label}...");
        }
        SessionState::Resolved { .. } => {
            if let Some(model) = session.display(Utc::now(), &Local, options) {
                print!("{}", weather_card(&model));
            }
        }
        SessionState::Error(message) => eprintln!("{message}"),
    }
}

pub fn weather_card(model: &DisplayModel) -> String {
    let rows = [
        ("Humidity", model.humidity.as_str()),
        ("Wind Speed", model.wind.as_str()),
        ("Visibility", model.visibility.as_str()),
        ("Sunrise", model.sunrise.as_str()),
        ("Sunset", model.sunset.as_str()),
    ];

    let mut out = format!(
        "\n{}\n{}, {}\n{} ({})\n{}\n\n",
        model.place_label,
        model.condition_description,
        model.temperature,
        model.place_name,
        if model.is_day { "day" } else { "night" },
        model.icon_url,
    );
    for (label, value) in rows {
        out.push_str(&format!("  {label:<11} {value}\n"));
    }
    out.push('\n');
    out
}
