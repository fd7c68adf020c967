//! Scripted in-memory portal for unit tests.
//!
//! Serves canned HTML per (method, url) and records every request, so tests
//! can assert both the outcome and how much network traffic a fetch caused.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::PortalConfig;
use crate::error::{Result, UsageError};

use super::session::{PortalSession, SessionFactory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub session: usize,
    pub method: Method,
    pub url: String,
    pub form: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
enum Reply {
    Body(String),
    Unreachable,
}

#[derive(Default)]
struct State {
    replies: HashMap<(Method, String), Reply>,
    requests: Vec<RecordedRequest>,
    sessions_opened: usize,
}

/// Cheaply cloneable handle; all clones share one script and request log.
#[derive(Clone, Default)]
pub struct ScriptedPortal {
    state: Arc<Mutex<State>>,
}

impl ScriptedPortal {
    pub fn new() -> Self {
        Self::default()
    }

    /// A portal that walks the whole happy path and renders `report_html`.
    pub fn happy_path(portal: &PortalConfig, report_html: &str) -> Self {
        let scripted = Self::new();
        scripted.on_get(&portal.login_page_url, &login_page("TICKET-1"));
        scripted.on_post(&portal.login_submit_url, "<html><body>welcome</body></html>");
        scripted.on_get(&portal.usage_nav_url, &nav_page("IV-1", "YM-1"));
        scripted.on_post(&portal.report_url, report_html);
        scripted
    }

    pub fn on_get(&self, url: &str, body: &str) {
        self.set(Method::Get, url, Reply::Body(body.to_string()));
    }

    pub fn on_post(&self, url: &str, body: &str) {
        self.set(Method::Post, url, Reply::Body(body.to_string()));
    }

    /// Make a request fail as if the host could not be reached.
    pub fn unreachable(&self, method: Method, url: &str) {
        self.set(method, url, Reply::Unreachable);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub fn sessions_opened(&self) -> usize {
        self.state.lock().unwrap().sessions_opened
    }

    fn set(&self, method: Method, url: &str, reply: Reply) {
        self.state
            .lock()
            .unwrap()
            .replies
            .insert((method, url.to_string()), reply);
    }
}

impl SessionFactory for ScriptedPortal {
    fn open_session(&self) -> Result<Box<dyn PortalSession>> {
        let id = {
            let mut state = self.state.lock().unwrap();
            state.sessions_opened += 1;
            state.sessions_opened
        };
        Ok(Box::new(ScriptedSession {
            id,
            portal: self.clone(),
        }))
    }
}

struct ScriptedSession {
    id: usize,
    portal: ScriptedPortal,
}

impl ScriptedSession {
    fn respond(&self, method: Method, url: &str, form: &[(&str, &str)]) -> Result<String> {
        let mut state = self.portal.state.lock().unwrap();
        state.requests.push(RecordedRequest {
            session: self.id,
            method,
            url: url.to_string(),
            form: form
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
        match state.replies.get(&(method, url.to_string())) {
            Some(Reply::Body(body)) => Ok(body.clone()),
            Some(Reply::Unreachable) => Err(UsageError::PortalUnavailable(format!(
                "connection refused: {}",
                url
            ))),
            None => Ok("<html><body>not found</body></html>".to_string()),
        }
    }
}

#[async_trait]
impl PortalSession for ScriptedSession {
    async fn get(&mut self, url: &str) -> Result<String> {
        self.respond(Method::Get, url, &[])
    }

    async fn post_form(&mut self, url: &str, form: &[(&str, &str)]) -> Result<String> {
        self.respond(Method::Post, url, form)
    }
}

pub fn login_page(ticket: &str) -> String {
    format!(
        r#"<html><body><form action="/login" method="post">
<input type="hidden" name="ticket" value="{}">
<input type="text" name="telnum"><input type="password" name="password">
</form></body></html>"#,
        ticket
    )
}

pub fn nav_page(mfiv: &str, mfym: &str) -> String {
    format!(
        r#"<html><body><form action="/resfe/top/" method="post">
<input type="hidden" name="mfiv" value="{}">
<input type="hidden" name="mfym" value="{}">
</form><script>document.forms[0].submit();</script></body></html>"#,
        mfiv, mfym
    )
}

/// A report page whose usage block holds one table per cell text.
///
/// Table 2 gets a leading filler row so the figure sits in row 2.
pub fn report_page(cells: &[&str]) -> String {
    let mut tables = String::new();
    for (i, cell) in cells.iter().enumerate() {
        let filler = if i == 1 {
            "<tr><th>plan</th><td>Simple M</td></tr>"
        } else {
            ""
        };
        tables.push_str(&format!(
            "<table><tbody>{}<tr><th>value</th><td>{}</td></tr><tr><td>999</td></tr></tbody></table>\n",
            filler, cell
        ));
    }
    format!(
        r#"<html><body>
<div class="header"><table><tbody><tr><td>ignored</td></tr></tbody></table></div>
<div class="list-toggle-content js-toggle-content m-top-20">
{}</div></body></html>"#,
        tables
    )
}

/// Cell texts from the worked example: 2.5 + 3.0 + 1.0 allowance, 4.2 used.
pub const SAMPLE_CELLS: [&str; 4] = ["\t2.5\nGB\t", "\n\n3.0 GB", "1.0GB", "4.2 GB "];
