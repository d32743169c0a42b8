//! HTML bodies for signup notifications.

use indoc::formatdoc;

use crate::event::{Event, Task, Volunteer};
use crate::notify::Message;

/// Thank-you note addressed to the volunteer who just signed up.
pub fn thank_you(event: &Event, task: &Task, volunteer: &Volunteer) -> Message {
    let html = formatdoc! {"
        <h2>Thank you for volunteering!</h2>
        <p>Dear {name},</p>
        <p>Thank you for signing up to help with <strong>{event}</strong>!</p>
        <p><strong>Event Details:</strong></p>
        <ul>
            <li><strong>Date:</strong> {date}</li>
            <li><strong>Time:</strong> {time}</li>
            <li><strong>Your Task:</strong> {task}</li>
        </ul>
        <p>{description}</p>
        <p>We'll send you more details as the event approaches. Thank you for your commitment to our club!</p>
        <p>Best regards,<br>Club Event Organizers</p>
        ",
        name = escape(&volunteer.name),
        event = escape(&event.name),
        date = escape(&event.date),
        time = escape(&event.time),
        task = escape(&task.name),
        description = escape(&event.description),
    };

    Message {
        to: volunteer.email.clone(),
        subject: format!("Thank you for volunteering - {}", event.name),
        html,
    }
}

/// Full roster dump for the organizer. `None` when the event has no
/// organizer address.
pub fn roster(event: &Event, task: &Task, volunteer: &Volunteer) -> Option<Message> {
    let to = event.organizer_email()?;
    let summary = event.fill_summary();

    let mut html = formatdoc! {"
        <h2>New Volunteer Signup - {event}</h2>
        <p><strong>New Volunteer:</strong> {name} ({email})</p>
        <p><strong>Task:</strong> {task}</p>
        <p><strong>Signup Time:</strong> {time}</p>
        <p><strong>Volunteer Summary:</strong> {filled}/{needed} positions filled ({percent}% complete)</p>
        <h3>Complete Current Roster:</h3>
        ",
        event = escape(&event.name),
        name = escape(&volunteer.name),
        email = escape(&volunteer.email),
        task = escape(&task.name),
        time = escape(&volunteer.signup_time),
        filled = summary.filled,
        needed = summary.needed,
        percent = summary.percent(),
    };

    for task in &event.tasks {
        html.push_str(&roster_section(task));
    }

    Some(Message {
        to: to.to_string(),
        subject: format!("Volunteer Roster Update - {}", event.name),
        html,
    })
}

fn roster_section(task: &Task) -> String {
    let mut section = format!(
        "<h4>{} ({}/{})</h4>\n",
        escape(&task.name),
        task.volunteers.len(),
        task.needed
    );

    if task.volunteers.is_empty() {
        section.push_str("<p>No volunteers yet</p>\n");
        return section;
    }

    section.push_str("<ul>\n");
    for v in &task.volunteers {
        let mut line = format!("{} - {}", escape(&v.name), escape(&v.email));
        if !v.phone.is_empty() {
            line.push_str(&format!(" - {}", escape(&v.phone)));
        }
        if !v.notes.is_empty() {
            line.push_str(&format!(" - Notes: {}", escape(&v.notes)));
        }
        section.push_str(&format!("    <li>{line}</li>\n"));
    }
    section.push_str("</ul>\n");
    section
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
