//! In-memory stand-in for the report site.
//!
//! Renders the same markup the scrapers expect, enforces per-render form
//! tokens on form posts, stores entries posted to the entry endpoint and
//! records every request for assertions.

#![allow(dead_code)]

use async_trait::async_trait;
use azubi_client::{AzubiClient, Endpoints, FormFields, HttpSession, PageResponse, SessionFactory};
use azubi_core::{BUILTIN_SUBJECTS, Result};
use chrono::{Datelike, NaiveDate};
use percent_encoding::percent_decode_str;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

pub const BASE_URL: &str = "http://azubi.test";
pub const USERNAME: &str = "azubi";
pub const PASSWORD: &str = "geheim";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub form: FormFields,
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn path(&self) -> &str {
        let without_base = self.url.strip_prefix(BASE_URL).unwrap_or(&self.url);
        without_base.split('?').next().unwrap_or_default()
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_entry_post(&self) -> bool {
        self.method == "POST" && self.path() == "/Azubi/XMLHttpRequest.ashx"
    }
}

#[derive(Debug, Clone)]
struct StoredEntry {
    seq: u32,
    subject_id: String,
    duration: String,
    fragment: String,
}

struct SiteState {
    weeks: Vec<(u32, i32, String)>,
    custom_subjects: Vec<(String, String)>,
    days: HashMap<String, Vec<StoredEntry>>,
    raw_days: HashMap<String, String>,
    next_seq: u32,
    next_subject_id: u32,
    token_counter: u32,
    entry_statuses: VecDeque<u16>,
    requests: Vec<RecordedRequest>,
    sessions_opened: usize,
    expired: bool,
    logout_status: Option<u16>,
}

pub struct FakeSite {
    state: Mutex<SiteState>,
}

impl FakeSite {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(SiteState {
                weeks: Vec::new(),
                custom_subjects: Vec::new(),
                days: HashMap::new(),
                raw_days: HashMap::new(),
                next_seq: 1,
                next_subject_id: 500,
                token_counter: 0,
                entry_statuses: VecDeque::new(),
                requests: Vec::new(),
                sessions_opened: 0,
                expired: false,
                logout_status: None,
            }),
        })
    }

    pub fn client(self: &Arc<Self>) -> AzubiClient {
        AzubiClient::with_session_factory(
            Arc::new(FakeFactory { site: self.clone() }),
            Endpoints::new(BASE_URL),
        )
    }

    pub fn add_week(&self, week: u32, year: i32, id: &str) {
        self.state.lock().unwrap().weeks.push((week, year, id.to_string()));
    }

    /// Registers the container holding `date`, with id `w<week>-<year>`.
    pub fn add_week_for(&self, date: NaiveDate) -> String {
        let iso = date.iso_week();
        let id = format!("w{}-{}", iso.week(), iso.year());
        self.add_week(iso.week(), iso.year(), &id);
        id
    }

    pub fn add_custom_subject(&self, id: &str, name: &str) {
        self.state
            .lock()
            .unwrap()
            .custom_subjects
            .push((id.to_string(), name.to_string()));
    }

    pub fn custom_subjects(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().custom_subjects.clone()
    }

    /// Serves `html` verbatim as the daily page of `date`.
    pub fn set_raw_day(&self, date: NaiveDate, html: &str) {
        self.state
            .lock()
            .unwrap()
            .raw_days
            .insert(date.format("%Y%m%d").to_string(), html.to_string());
    }

    /// Stores an entry as if it had been written earlier; returns its sequence.
    pub fn seed_entry(&self, date: NaiveDate, subject_id: &str, duration: &str, fragment: &str) -> u32 {
        let mut state = self.state.lock().unwrap();
        let seq = state.next_seq;
        state.next_seq += 1;
        state
            .days
            .entry(date.format("%Y%m%d").to_string())
            .or_default()
            .push(StoredEntry {
                seq,
                subject_id: subject_id.to_string(),
                duration: duration.to_string(),
                fragment: fragment.to_string(),
            });
        seq
    }

    pub fn stored_sequences(&self, date: NaiveDate) -> Vec<u32> {
        self.state
            .lock()
            .unwrap()
            .days
            .get(&date.format("%Y%m%d").to_string())
            .map(|entries| entries.iter().map(|e| e.seq).collect())
            .unwrap_or_default()
    }

    /// Statuses for the next entry-endpoint posts, consumed in order.
    pub fn queue_entry_statuses(&self, statuses: &[u16]) {
        self.state.lock().unwrap().entry_statuses.extend(statuses);
    }

    /// Simulates a server-side session timeout for every open session.
    pub fn expire_sessions(&self) {
        self.state.lock().unwrap().expired = true;
    }

    /// Makes the logout page answer with `status` and keep the session alive.
    pub fn fail_logout(&self, status: u16) {
        self.state.lock().unwrap().logout_status = Some(status);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub fn entry_posts(&self) -> Vec<RecordedRequest> {
        self.requests().into_iter().filter(|r| r.is_entry_post()).collect()
    }

    pub fn sessions_opened(&self) -> usize {
        self.state.lock().unwrap().sessions_opened
    }

    fn next_tokens(state: &mut SiteState) -> String {
        state.token_counter += 1;
        format!("vs-{}", state.token_counter)
    }

    fn token_inputs(view_state: &str) -> String {
        format!(
            r#"<input type="hidden" name="__VIEWSTATE" id="__VIEWSTATE" value="{view_state}" />
               <input type="hidden" name="__VIEWSTATEGENERATOR" id="__VIEWSTATEGENERATOR" value="C2EE9ABB" />
               <input type="hidden" name="__EVENTVALIDATION" id="__EVENTVALIDATION" value="ev-{view_state}" />"#
        )
    }

    fn subject_name(state: &SiteState, id: &str) -> String {
        BUILTIN_SUBJECTS
            .iter()
            .find(|(builtin, _)| *builtin == id)
            .map(|(_, name)| name.to_string())
            .or_else(|| {
                state
                    .custom_subjects
                    .iter()
                    .find(|(custom, _)| custom == id)
                    .map(|(_, name)| name.clone())
            })
            .unwrap_or_else(|| "Unbekannt".to_string())
    }

    fn render_day(state: &SiteState, key: &str) -> String {
        if let Some(raw) = state.raw_days.get(key) {
            return raw.clone();
        }
        let mut html = String::from("<html><body><div id=\"Tag\">");
        // The site always renders an empty slot.
        html.push_str(
            r#"<div class="d0 mo" data-seq="0"><div class="row1 d3">Art: Betrieb</div><div class="row2 d4">00:00</div><div class="row7 d5"></div></div>"#,
        );
        for entry in state.days.get(key).into_iter().flatten() {
            html.push_str(&format!(
                r#"<div class="d0 mo" data-seq="{}"><div class="row1 d3">Art: {}</div><div class="row2 d4">{}</div><div class="row7 d5">{}</div></div>"#,
                entry.seq,
                Self::subject_name(state, &entry.subject_id),
                entry.duration,
                entry.fragment
            ));
        }
        html.push_str("</div></body></html>");
        html
    }

    fn render_overview(state: &SiteState) -> String {
        let mut html = String::from("<html><body>");
        for (week, year, id) in &state.weeks {
            html.push_str(&format!(
                r#"<div class="mo NBox" onclick="location.href='Wochenansicht.aspx?NachweisNr={id}'">
                    <div class="sKW">{week}</div>
                    <div class="KW"><div>KW</div><div>{week}</div><div>{year}</div></div>
                </div>"#
            ));
        }
        html.push_str("</body></html>");
        html
    }

    fn query_param<'u>(url: &'u str, name: &str) -> Option<&'u str> {
        let query = url.split_once('?')?.1;
        query.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key == name).then_some(value)
        })
    }

    fn handle(&self, session: &FakeSession, request: RecordedRequest) -> PageResponse {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());

        if state.expired {
            *session.logged_in.lock().unwrap() = false;
        }
        let logged_in = *session.logged_in.lock().unwrap();

        let login_page = |state: &mut SiteState, session: &FakeSession| {
            let tokens = Self::next_tokens(state);
            *session.issued_view_state.lock().unwrap() = Some(tokens.clone());
            PageResponse::new(
                200,
                format!(
                    "<html><body><form id=\"form1\">{}<input name=\"txt_Benutzername\"/></form></body></html>",
                    Self::token_inputs(&tokens)
                ),
            )
        };
        let tokens_valid = |request: &RecordedRequest, session: &FakeSession| {
            let issued = session.issued_view_state.lock().unwrap().clone();
            issued.is_some()
                && request.field("__VIEWSTATE") == issued.as_deref()
                && request.field("__EVENTVALIDATION").map(str::to_string)
                    == issued.map(|vs| format!("ev-{vs}"))
        };

        match (request.method, request.path()) {
            ("GET", "/Login.aspx") => login_page(&mut *state, session),
            ("POST", "/Login.aspx") => {
                if !tokens_valid(&request, session) {
                    return PageResponse::new(500, "Invalid viewstate");
                }
                if request.field("ctl00$ContentPlaceHolder1$txt_Benutzername") == Some(USERNAME)
                    && request.field("ctl00$ContentPlaceHolder1$txt_Passwort") == Some(PASSWORD)
                {
                    *session.logged_in.lock().unwrap() = true;
                    state.expired = false;
                }
                login_page(&mut *state, session)
            }
            (_, _) if !logged_in => login_page(&mut *state, session),
            ("GET", "/Azubi/Default.aspx") => PageResponse::new(
                200,
                r#"<html><body><a id="Abmelden" href="Abmelden.aspx">Abmelden</a></body></html>"#,
            ),
            ("GET", "/Azubi/Abmelden.aspx") => {
                if let Some(status) = state.logout_status {
                    return PageResponse::new(status, "error");
                }
                *session.logged_in.lock().unwrap() = false;
                PageResponse::new(200, "<html><body>Abgemeldet</body></html>")
            }
            ("GET", "/Azubi/Ausbildungsnachweise.aspx") => {
                PageResponse::new(200, Self::render_overview(&state))
            }
            ("GET", "/Azubi/SetupSchulfach.aspx") => {
                let tokens = Self::next_tokens(&mut state);
                *session.issued_view_state.lock().unwrap() = Some(tokens.clone());
                let inputs: String = state
                    .custom_subjects
                    .iter()
                    .map(|(id, name)| format!(r#"<input type="text" data-default="{id}" value="{name}" />"#))
                    .collect();
                PageResponse::new(
                    200,
                    format!(
                        "<html><body><form>{}<div id=\"divSchulfach\">{}</div></form></body></html>",
                        Self::token_inputs(&tokens),
                        inputs
                    ),
                )
            }
            ("POST", "/Azubi/SetupSchulfach.aspx") => {
                if !tokens_valid(&request, session) {
                    return PageResponse::new(500, "Invalid viewstate");
                }
                if request.field("ctl00$ContentPlaceHolder1$cmd_Save") != Some("Speichern") {
                    return PageResponse::new(400, "no save directive");
                }
                // Full rewrite: only custom subjects present in the payload survive.
                let mut kept: Vec<(String, String)> = state
                    .custom_subjects
                    .iter()
                    .filter_map(|(id, _)| {
                        request
                            .field(&format!("ctl00$ContentPlaceHolder1$txt{id}"))
                            .map(|name| (id.clone(), name.to_string()))
                    })
                    .collect();
                let new_names: Vec<String> = request
                    .form
                    .iter()
                    .filter(|(k, _)| {
                        k.strip_prefix("txt")
                            .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
                    })
                    .map(|(_, v)| v.clone())
                    .collect();
                for name in new_names {
                    let id = state.next_subject_id.to_string();
                    state.next_subject_id += 1;
                    kept.push((id, name));
                }
                state.custom_subjects = kept;
                PageResponse::new(200, "<html><body>Gespeichert</body></html>")
            }
            ("GET", "/Azubi/Tagesbericht.aspx") => {
                let key = Self::query_param(&request.url, "Datum").unwrap_or_default().to_string();
                PageResponse::new(200, Self::render_day(&state, &key))
            }
            ("POST", "/Azubi/XMLHttpRequest.ashx") => {
                if let Some(status) = state.entry_statuses.pop_front() {
                    if status != 200 {
                        return PageResponse::new(status, "error");
                    }
                }
                if request.header("x-my-ajax-request") != Some("ajax") {
                    return PageResponse::new(400, "not an ajax request");
                }
                let Some(date) = Self::query_param(&request.url, "Datum")
                    .and_then(|d| NaiveDate::parse_from_str(d, "%Y%m%d").ok())
                else {
                    return PageResponse::new(400, "bad date");
                };
                let week_id = Self::query_param(&request.url, "BrNr").unwrap_or_default();
                let iso = date.iso_week();
                let week_matches = state
                    .weeks
                    .iter()
                    .any(|(w, y, id)| id == week_id && *w == iso.week() && *y == iso.year());
                if !week_matches {
                    return PageResponse::new(400, "week does not hold date");
                }

                let key = date.format("%Y%m%d").to_string();
                let seq = request.field("Seq").unwrap_or_default().to_string();
                if seq == "0" {
                    let fragment = percent_decode_str(request.field("Inhalt").unwrap_or_default())
                        .decode_utf8_lossy()
                        .to_string();
                    let entry = StoredEntry {
                        seq: state.next_seq,
                        subject_id: request.field("Art_ID").unwrap_or_default().to_string(),
                        duration: request.field("Dauer").unwrap_or_default().to_string(),
                        fragment,
                    };
                    state.next_seq += 1;
                    state.days.entry(key).or_default().push(entry);
                } else if let Some(target) = seq.strip_prefix('-').and_then(|s| s.parse::<u32>().ok()) {
                    if let Some(entries) = state.days.get_mut(&key) {
                        entries.retain(|e| e.seq != target);
                    }
                }
                PageResponse::new(200, "OK")
            }
            _ => PageResponse::new(404, "not found"),
        }
    }
}

pub struct FakeSession {
    site: Arc<FakeSite>,
    logged_in: Mutex<bool>,
    issued_view_state: Mutex<Option<String>>,
}

#[async_trait]
impl HttpSession for FakeSession {
    async fn get(&self, url: &str) -> Result<PageResponse> {
        let request = RecordedRequest {
            method: "GET",
            url: url.to_string(),
            form: Vec::new(),
            headers: Vec::new(),
        };
        Ok(self.site.handle(self, request))
    }

    async fn post_form(
        &self,
        url: &str,
        form: &FormFields,
        headers: &[(&str, &str)],
    ) -> Result<PageResponse> {
        let request = RecordedRequest {
            method: "POST",
            url: url.to_string(),
            form: form.clone(),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        };
        Ok(self.site.handle(self, request))
    }
}

pub struct FakeFactory {
    site: Arc<FakeSite>,
}

impl SessionFactory for FakeFactory {
    fn open_session(&self) -> Result<Arc<dyn HttpSession>> {
        self.site.state.lock().unwrap().sessions_opened += 1;
        Ok(Arc::new(FakeSession {
            site: self.site.clone(),
            logged_in: Mutex::new(false),
            issued_view_state: Mutex::new(None),
        }))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A client already logged in against `site`.
pub async fn logged_in_client(site: &Arc<FakeSite>) -> AzubiClient {
    let mut client = site.client();
    client.login(USERNAME, PASSWORD).await.expect("login should succeed");
    client
}
