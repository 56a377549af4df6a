use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Tera, Value};

lazy_static! {
    pub static ref MAILS: Tera = create();
}

fn create() -> Tera {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("reset.html", include_str!("../templates/reset.html")),
        ("reset.txt", include_str!("../templates/reset.txt")),
    ]).expect("built-in mail templates should compile");
    tera.register_filter("attr", attr_filter);
    tera
}

/// Escape a string for use in an HTML attribute or text.
///
/// Unlike Tera's own `escape` this leaves `/` alone, so URLs stay readable
/// and comparable.
fn attr_filter(value: Value, _: HashMap<String, Value>) -> tera::Result<Value> {
    let value = value.as_str()
        .ok_or_else(|| format!("Filter `attr` expects a string, got {}", value))?;
    Ok(Value::String(escape_attr(value)))
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

/// Render a named template with a given context.
///
/// Since [`tera::Error`] is neither `Send` nor `Sync` it is flattened into
/// its message, including messages of all its causes.
pub fn render<T>(name: &str, context: &T) -> Result<String, String>
where
    T: Serialize,
{
    MAILS.render(name, context).map_err(|e| {
        let mut msg = String::new();
        for (inx, err) in e.iter().enumerate() {
            if inx > 0 {
                msg.push_str(": ");
            }
            msg.push_str(&err.to_string());
        }
        msg
    })
}

/// Arguments for `reset`.
#[derive(Serialize)]
pub struct ResetMailArgs<'a> {
    /// Email address of the user whose password is being reset.
    pub email: &'a str,
    /// Password reset URL.
    pub url: &'a str,
    /// Number of minutes after which `url` stops working.
    pub expires_in: i64,
    /// Time at which `url` stops working.
    pub expires_at: &'a str,
}
