//! HTML page rendering.
//!
//! Every page is a complete document built with `format!` around a shared
//! layout. User-supplied text always goes through [`escape`].

use llog_core::{Entry, EntryForm, FieldErrors, Topic, TopicForm};

use crate::routes::Route;

pub struct Renderer {
    date_format: String,
}

impl Renderer {
    pub fn new(date_format: impl Into<String>) -> Self {
        Self {
            date_format: date_format.into(),
        }
    }

    pub fn index(&self) -> String {
        layout(
            "Home",
            "<h1>Learning Log</h1>\n\
             <p>Learning Log helps you keep track of your learning, for any topic you're learning about.</p>\n",
        )
    }

    pub fn page(&self) -> String {
        layout(
            "Page",
            "<h1>Page</h1>\n\
             <p>Topics hold entries. Add a topic, then write entries under it as you learn.</p>\n",
        )
    }

    pub fn topics(&self, topics: &[Topic]) -> String {
        let items: String = if topics.is_empty() {
            "<li>No topics have been added yet.</li>\n".to_string()
        } else {
            topics
                .iter()
                .map(|topic| {
                    format!(
                        "<li><a href=\"{}\">{}</a></li>\n",
                        Route::Topic(topic.id).url(),
                        escape(&topic.text)
                    )
                })
                .collect()
        };
        let body = format!(
            "<h1>Topics</h1>\n<ul>\n{items}</ul>\n<p><a href=\"{}\">Add a new topic</a></p>\n",
            Route::NewTopic.url()
        );
        layout("Topics", &body)
    }

    pub fn topic(&self, topic: &Topic, entries: &[Entry]) -> String {
        let items: String = if entries.is_empty() {
            "<li>There are no entries for this topic yet.</li>\n".to_string()
        } else {
            entries.iter().map(|entry| self.entry_item(entry)).collect()
        };
        let body = format!(
            "<h1>Topic: {}</h1>\n<p>Entries:</p>\n<p><a href=\"{}\">Add new entry</a></p>\n<ul>\n{items}</ul>\n",
            escape(&topic.text),
            Route::NewEntry(topic.id).url()
        );
        layout(&topic.text, &body)
    }

    fn entry_item(&self, entry: &Entry) -> String {
        format!(
            "<li>\n<p class=\"date\">{}</p>\n{}<p><a href=\"{}\">Edit entry</a></p>\n</li>\n",
            entry.date_added.format(&self.date_format),
            linebreaks(&entry.text),
            Route::EditEntry(entry.id).url()
        )
    }

    pub fn new_topic(&self, form: &TopicForm, errors: &FieldErrors) -> String {
        let body = format!(
            "<p>Add a new topic:</p>\n{}",
            form_block(
                Route::NewTopic,
                &text_input(&form.text),
                errors,
                "Add topic"
            )
        );
        layout("New topic", &body)
    }

    pub fn new_entry(&self, topic: &Topic, form: &EntryForm, errors: &FieldErrors) -> String {
        let body = format!(
            "<p><a href=\"{}\">{}</a></p>\n<p>Add a new entry:</p>\n{}",
            Route::Topic(topic.id).url(),
            escape(&topic.text),
            form_block(
                Route::NewEntry(topic.id),
                &textarea(&form.text),
                errors,
                "Add entry"
            )
        );
        layout("New entry", &body)
    }

    pub fn edit_entry(
        &self,
        topic: &Topic,
        entry: &Entry,
        form: &EntryForm,
        errors: &FieldErrors,
    ) -> String {
        let body = format!(
            "<p><a href=\"{}\">{}</a></p>\n<p>Edit entry:</p>\n{}",
            Route::Topic(topic.id).url(),
            escape(&topic.text),
            form_block(
                Route::EditEntry(entry.id),
                &textarea(&form.text),
                errors,
                "Save changes"
            )
        );
        layout("Edit entry", &body)
    }
}

pub fn not_found_page(message: &str) -> String {
    layout(
        "Not found",
        &format!("<h1>Not found</h1>\n<p>{}</p>\n", escape(message)),
    )
}

pub fn server_error_page() -> String {
    layout(
        "Server error",
        "<h1>Server error</h1>\n<p>Something went wrong while handling this request.</p>\n",
    )
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title} - Learning Log</title>\n\
         </head>\n\
         <body>\n\
         <nav>\n\
         <a href=\"{home}\">Learning Log</a> -\n\
         <a href=\"{page}\">Page</a> -\n\
         <a href=\"{topics}\">Topics</a>\n\
         </nav>\n\
         <main>\n\
         {body}\
         </main>\n\
         </body>\n\
         </html>\n",
        title = escape(title),
        home = Route::Index.url(),
        page = Route::Page.url(),
        topics = Route::Topics.url(),
    )
}

fn form_block(action: Route, input: &str, errors: &FieldErrors, submit: &str) -> String {
    let messages = errors.get("text");
    let error_list = if messages.is_empty() {
        String::new()
    } else {
        let items: String = messages
            .iter()
            .map(|message| format!("<li>{}</li>\n", escape(message)))
            .collect();
        format!("<ul class=\"errorlist\">\n{items}</ul>\n")
    };
    format!(
        "<form action=\"{}\" method=\"post\">\n{error_list}{input}\
         <button type=\"submit\" name=\"submit\">{submit}</button>\n</form>\n",
        action.url()
    )
}

fn text_input(value: &str) -> String {
    format!(
        "<input type=\"text\" name=\"text\" value=\"{}\" required>\n",
        escape(value)
    )
}

fn textarea(value: &str) -> String {
    format!(
        "<textarea name=\"text\" cols=\"80\" rows=\"10\" required>{}</textarea>\n",
        escape(value)
    )
}

/// Escapes text for use in element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Blank lines start a new paragraph, single newlines become `<br>`.
pub fn linebreaks(text: &str) -> String {
    text.replace("\r\n", "\n")
        .split("\n\n")
        .map(|paragraph| paragraph.trim_matches('\n'))
        .filter(|paragraph| !paragraph.is_empty())
        .map(|paragraph| {
            let lines: Vec<String> = paragraph.lines().map(escape).collect();
            format!("<p>{}</p>\n", lines.join("<br>\n"))
        })
        .collect()
}
