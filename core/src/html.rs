//! HTML backend for `render::View`.
//!
//! Produces the markup for the todo container. Buttons carry
//! `data-action` / `data-todo-id` attributes for a host to dispatch on,
//! rather than inline script handlers.

use crate::render::{escape_html, Action, Body, EmptyState, ItemView, Status, View};
use crate::types::ViewMode;

pub fn render_view(view: &View) -> String {
    match &view.body {
        Body::Loading => concat!(
            r#"<div class="loading" role="status">"#,
            r#"<p>Loading your todos...</p>"#,
            "</div>\n"
        )
        .to_string(),
        Body::Empty(EmptyState::NoTodos) => concat!(
            r#"<div class="empty-state">"#,
            "<h4>No todos found</h4>",
            "<p>Create your first todo with the markdown editor above!</p>",
            "</div>\n"
        )
        .to_string(),
        Body::Empty(EmptyState::LoadFailed { message, retry }) => format!(
            concat!(
                r#"<div class="empty-state error">"#,
                "<h4>Something went wrong</h4>",
                "<p>{}</p>",
                r#"<button class="btn btn-primary" data-action="{}">Try Again</button>"#,
                "</div>\n"
            ),
            escape_html(message),
            retry.name()
        ),
        Body::Items(items) => {
            let class = match view.layout {
                ViewMode::Card => "card-view",
                ViewMode::List => "list-view",
            };
            let mut html = format!("<div class=\"{class}\">\n");
            for item in items {
                render_item(&mut html, item);
            }
            html.push_str("</div>\n");
            html
        }
    }
}

fn render_item(out: &mut String, item: &ItemView) {
    out.push_str(&format!(
        "<div class=\"todo-item {}\" data-todo-id=\"{}\">\n",
        item.status.css_class(),
        item.id
    ));
    out.push_str(&format!(
        "<div class=\"todo-title\">{}</div>\n",
        item.title_html
    ));
    if let Some(content) = &item.content_html {
        out.push_str(&format!(
            "<div class=\"todo-content markdown-preview\">{content}</div>\n"
        ));
    }
    let badge = match item.status {
        Status::Completed => "bg-success",
        Status::Pending => "bg-primary",
    };
    out.push_str(&format!(
        "<div class=\"todo-meta\">Created: {} <span class=\"badge {badge}\">{}</span></div>\n",
        item.created_label,
        item.status.label()
    ));
    out.push_str("<div class=\"todo-actions\">");
    for button in &item.actions {
        let id = match button.action {
            Action::Toggle(id) | Action::Edit(id) | Action::Delete(id) => id,
            Action::Reload => continue,
        };
        out.push_str(&format!(
            "<button class=\"btn btn-sm\" data-action=\"{}\" data-todo-id=\"{id}\">{}</button>",
            button.action.name(),
            button.label
        ));
    }
    out.push_str("</div>\n</div>\n");
}
