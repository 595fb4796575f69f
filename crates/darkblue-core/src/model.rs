//! Configuration document data model.
//!
//! A configuration document describes one competition image: scalar metadata
//! (format marker, operating system, point total, readme) and one list of
//! entries per scoring category. Field names follow the JSON written by the
//! editor so documents round-trip through load and save without loss.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Marker stored in the `format` attribute of every recognized document.
pub const FORMAT_MARKER: &str = "DarkBlue";

/// Supported image operating systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Os {
    Linux,
    Windows,
}

impl Os {
    /// Parse the exact tag stored in a document's `OS` attribute.
    pub fn from_tag(tag: &str) -> Option<Os> {
        match tag {
            "Linux" => Some(Os::Linux),
            "Windows" => Some(Os::Windows),
            _ => None,
        }
    }

    /// The tag written to a document's `OS` attribute.
    pub fn as_tag(&self) -> &'static str {
        match self {
            Os::Linux => "Linux",
            Os::Windows => "Windows",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl FromStr for Os {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linux" => Ok(Os::Linux),
            "windows" | "win" => Ok(Os::Windows),
            other => Err(format!("unknown operating system: {other}")),
        }
    }
}

/// The scoring categories a document can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Questions,
    Filepaths,
    Users,
    Services,
    Processes,
    Programs,
    Packages,
    Firewall,
    Registry,
    ConfigFiles,
}

const LINUX_ORDER: [Category; 6] = [
    Category::Questions,
    Category::Filepaths,
    Category::Users,
    Category::Processes,
    Category::Packages,
    Category::ConfigFiles,
];

const WINDOWS_ORDER: [Category; 7] = [
    Category::Questions,
    Category::Filepaths,
    Category::Users,
    Category::Services,
    Category::Programs,
    Category::Firewall,
    Category::Registry,
];

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Questions,
        Category::Filepaths,
        Category::Users,
        Category::Services,
        Category::Processes,
        Category::Programs,
        Category::Packages,
        Category::Firewall,
        Category::Registry,
        Category::ConfigFiles,
    ];

    /// Categories scored for `os`, in evaluation order. The OS-independent
    /// categories always come first.
    pub fn evaluation_order(os: Os) -> &'static [Category] {
        match os {
            Os::Linux => &LINUX_ORDER,
            Os::Windows => &WINDOWS_ORDER,
        }
    }

    pub fn applies_to(&self, os: Os) -> bool {
        Category::evaluation_order(os).contains(self)
    }

    /// The attribute name the category is stored under.
    pub fn key(&self) -> &'static str {
        match self {
            Category::Questions => "challenge_questions",
            Category::Filepaths => "files",
            Category::Users => "users",
            Category::Services => "services",
            Category::Processes => "processes",
            Category::Programs => "programs",
            Category::Packages => "packages",
            Category::Firewall => "firewall",
            Category::Registry => "registry",
            Category::ConfigFiles => "config_files",
        }
    }

    /// Every attribute name the category is read from, canonical key first.
    pub fn keys(&self) -> &'static [&'static str] {
        match self {
            Category::Questions => &["challenge_questions", "questions"],
            Category::Filepaths => &["files", "filepaths"],
            Category::ConfigFiles => &["config_files", "configfiles"],
            Category::Users => &["users"],
            Category::Services => &["services"],
            Category::Processes => &["processes"],
            Category::Programs => &["programs"],
            Category::Packages => &["packages"],
            Category::Firewall => &["firewall"],
            Category::Registry => &["registry"],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Questions => "Questions",
            Category::Filepaths => "Filepaths",
            Category::Users => "Users",
            Category::Services => "Services",
            Category::Processes => "Processes",
            Category::Programs => "Programs",
            Category::Packages => "Packages",
            Category::Firewall => "Firewall",
            Category::Registry => "Registry",
            Category::ConfigFiles => "Config files",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The root configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationDocument {
    /// Format marker; must equal [`FORMAT_MARKER`].
    #[serde(
        default,
        deserialize_with = "lenient_tag",
        skip_serializing_if = "Option::is_none"
    )]
    pub format: Option<String>,
    /// Operating system tag, "Linux" or "Windows".
    #[serde(
        default,
        rename = "OS",
        alias = "os",
        deserialize_with = "lenient_tag",
        skip_serializing_if = "Option::is_none"
    )]
    pub os: Option<String>,
    /// Points available on the image.
    #[serde(default, deserialize_with = "lenient_int")]
    pub score: i64,
    /// Free-text readme shown to competitors.
    #[serde(default, deserialize_with = "lenient")]
    pub readme: String,
    #[serde(
        default,
        rename = "challenge_questions",
        alias = "questions",
        deserialize_with = "lenient_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub questions: Option<Vec<Question>>,
    #[serde(
        default,
        rename = "files",
        alias = "filepaths",
        deserialize_with = "lenient_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub filepaths: Option<Vec<FilepathEntry>>,
    #[serde(
        default,
        deserialize_with = "lenient_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub users: Option<Vec<User>>,
    #[serde(
        default,
        deserialize_with = "lenient_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub services: Option<Vec<Service>>,
    #[serde(
        default,
        deserialize_with = "lenient_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub processes: Option<Vec<Process>>,
    #[serde(
        default,
        deserialize_with = "lenient_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub programs: Option<Vec<Program>>,
    #[serde(
        default,
        deserialize_with = "lenient_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub packages: Option<Vec<Package>>,
    #[serde(
        default,
        rename = "firewall",
        deserialize_with = "lenient_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub firewall_profiles: Option<Vec<FirewallProfile>>,
    #[serde(
        default,
        rename = "registry",
        deserialize_with = "lenient_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub registry_entries: Option<Vec<RegistryEntry>>,
    #[serde(
        default,
        rename = "config_files",
        alias = "configfiles",
        deserialize_with = "lenient_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub config_files: Option<Vec<ConfigFileCheck>>,
    /// Attributes this crate does not model, kept for round-tripping.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A category list that is absent, null or not a list holds no entries.
/// Items that are not objects are skipped; the remaining entries are kept.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => Ok(Some(
            items
                .into_iter()
                .filter_map(|item| match serde_json::from_value::<T>(item) {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        tracing::warn!("ignoring malformed category entry: {e}");
                        None
                    }
                })
                .collect(),
        )),
        Some(other) => {
            tracing::warn!("ignoring category that is not a list: {other}");
            Ok(None)
        }
    }
}

/// Read a field, taking the default for `null` or a value of the wrong type.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Point values: integers, floats (truncated) and numeric strings.
fn int_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(int_value(&Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_opt_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(int_value(&Value::deserialize(deserializer)?))
}

/// Header tags keep non-string values as their JSON text so the header
/// check can name them.
fn lenient_tag<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(tag)) => Some(tag),
        Some(other) => Some(other.to_string()),
    })
}

impl ConfigurationDocument {
    /// A fresh document for `os` with empty lists for every applicable category.
    pub fn new(os: Os) -> Self {
        let mut document = Self {
            format: Some(FORMAT_MARKER.to_string()),
            os: Some(os.as_tag().to_string()),
            ..Self::default()
        };
        for category in Category::evaluation_order(os) {
            match category {
                Category::Questions => document.questions = Some(Vec::new()),
                Category::Filepaths => document.filepaths = Some(Vec::new()),
                Category::Users => document.users = Some(Vec::new()),
                Category::Services => document.services = Some(Vec::new()),
                Category::Processes => document.processes = Some(Vec::new()),
                Category::Programs => document.programs = Some(Vec::new()),
                Category::Packages => document.packages = Some(Vec::new()),
                Category::Firewall => document.firewall_profiles = Some(default_firewall()),
                Category::Registry => document.registry_entries = Some(Vec::new()),
                Category::ConfigFiles => document.config_files = Some(Vec::new()),
            }
        }
        document
    }

    /// The document's operating system, if the tag is recognized.
    pub fn platform(&self) -> Option<Os> {
        self.os.as_deref().and_then(Os::from_tag)
    }

    /// Entries of `category` viewed as the variant `os` scores them as.
    ///
    /// Returns `None` when the category list is absent from the document.
    pub fn entries(&self, category: Category, os: Os) -> Option<Vec<Entry<'_>>> {
        fn view<'a, T>(list: &'a Option<Vec<T>>, wrap: fn(&'a T) -> Entry<'a>) -> Option<Vec<Entry<'a>>> {
            list.as_ref().map(|items| items.iter().map(wrap).collect())
        }

        match category {
            Category::Questions => view(&self.questions, Entry::Question),
            Category::Filepaths => view(&self.filepaths, Entry::Filepath),
            Category::Users => match os {
                Os::Linux => view(&self.users, Entry::LinuxUser),
                Os::Windows => view(&self.users, Entry::WindowsUser),
            },
            Category::Services => view(&self.services, Entry::Service),
            Category::Processes => view(&self.processes, Entry::Process),
            Category::Programs => view(&self.programs, Entry::Program),
            Category::Packages => view(&self.packages, Entry::Package),
            Category::Firewall => view(&self.firewall_profiles, Entry::FirewallProfile),
            Category::Registry => view(&self.registry_entries, Entry::RegistryEntry),
            Category::ConfigFiles => view(&self.config_files, Entry::ConfigFile),
        }
    }
}

/// The three Windows firewall profiles the editor starts with.
fn default_firewall() -> Vec<FirewallProfile> {
    ["public", "private", "domain"]
        .into_iter()
        .map(|name| FirewallProfile {
            name: name.to_string(),
            ..FirewallProfile::default()
        })
        .collect()
}

/// A borrowed view of one entry, tagged with how it is scored.
#[derive(Debug, Clone, Copy)]
pub enum Entry<'a> {
    Question(&'a Question),
    Filepath(&'a FilepathEntry),
    LinuxUser(&'a User),
    WindowsUser(&'a User),
    Service(&'a Service),
    Process(&'a Process),
    Program(&'a Program),
    Package(&'a Package),
    FirewallProfile(&'a FirewallProfile),
    RegistryEntry(&'a RegistryEntry),
    ConfigFile(&'a ConfigFileCheck),
}

impl<'a> Entry<'a> {
    /// The label used to name the entry in reports.
    pub fn identity(&self) -> &'a str {
        match self {
            Entry::Question(q) => &q.name,
            Entry::Filepath(f) => &f.filepath,
            Entry::LinuxUser(u) | Entry::WindowsUser(u) => &u.name,
            Entry::Service(s) => &s.common_name,
            Entry::Process(p) => &p.name,
            Entry::Program(p) | Entry::Package(p) => &p.name,
            Entry::FirewallProfile(f) => &f.name,
            Entry::RegistryEntry(r) => &r.entry_name,
            Entry::ConfigFile(c) => &c.filepath,
        }
    }

    /// Points the entry awards when its transition is scored.
    pub fn positive_points(&self) -> i64 {
        match self {
            Entry::Question(q) => q.points.unwrap_or(0),
            Entry::Filepath(f) => f.positive_points,
            Entry::LinuxUser(u) | Entry::WindowsUser(u) => u.positive_points,
            Entry::Service(s) => s.positive_points,
            Entry::Process(p) => p.positive_points,
            Entry::Program(p) | Entry::Package(p) => p.positive_points,
            Entry::FirewallProfile(f) => f.positive_points,
            Entry::RegistryEntry(r) => r.positive_points,
            Entry::ConfigFile(c) => c.positive_points,
        }
    }

    /// The recorded deduction budget. Never applied by the evaluator.
    pub fn negative_points(&self) -> i64 {
        match self {
            Entry::Question(_) => 0,
            Entry::Filepath(f) => f.negative_points,
            Entry::LinuxUser(u) | Entry::WindowsUser(u) => u.negative_points,
            Entry::Service(s) => s.negative_points,
            Entry::Process(p) => p.negative_points,
            Entry::Program(p) | Entry::Package(p) => p.negative_points,
            Entry::FirewallProfile(f) => f.negative_points,
            Entry::RegistryEntry(r) => r.negative_points,
            Entry::ConfigFile(c) => c.negative_points,
        }
    }
}

/// A free-text challenge question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Question {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub index: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub name: String,
    #[serde(deserialize_with = "lenient")]
    pub question_content: String,
    #[serde(deserialize_with = "lenient")]
    pub answer: Option<String>,
    #[serde(deserialize_with = "lenient_opt_int")]
    pub points: Option<i64>,
}

/// A file whose presence is part of the scored state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilepathEntry {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub index: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub filepath: String,
    /// Whether the file should still exist after remediation.
    #[serde(deserialize_with = "lenient")]
    pub exist: bool,
    /// Whether the image generator creates the file.
    #[serde(deserialize_with = "lenient")]
    pub create: bool,
    #[serde(deserialize_with = "lenient_int")]
    pub positive_points: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub negative_points: i64,
}

/// A local account. Linux documents use the sudo fields, Windows documents
/// the administrator fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub index: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub name: String,
    #[serde(deserialize_with = "lenient")]
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub is_admin: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub admin_initial_state: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub is_sudo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub sudo_initial_state: Option<bool>,
    #[serde(deserialize_with = "lenient_int")]
    pub positive_points: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub negative_points: i64,
}

impl User {
    /// `(desired, initial)` privilege flags as `os` reads them.
    pub fn privilege(&self, os: Os) -> (bool, bool) {
        match os {
            Os::Linux => (
                self.is_sudo.unwrap_or(false),
                self.sudo_initial_state.unwrap_or(false),
            ),
            Os::Windows => (
                self.is_admin.unwrap_or(false),
                self.admin_initial_state.unwrap_or(false),
            ),
        }
    }
}

/// Run state of a Windows service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Running,
    Stopped,
}

impl ServiceState {
    /// Case-insensitive parse; empty or unknown values yield `None`.
    pub fn parse(raw: &str) -> Option<ServiceState> {
        match raw.trim().to_lowercase().as_str() {
            "running" => Some(ServiceState::Running),
            "stopped" => Some(ServiceState::Stopped),
            _ => None,
        }
    }
}

/// A Windows service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Service {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub index: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub name: String,
    #[serde(deserialize_with = "lenient")]
    pub common_name: String,
    #[serde(deserialize_with = "lenient")]
    pub default_state: String,
    #[serde(deserialize_with = "lenient")]
    pub desired_state: String,
    #[serde(deserialize_with = "lenient")]
    pub startup_state: String,
    #[serde(deserialize_with = "lenient")]
    pub desired_startup_state: String,
    #[serde(deserialize_with = "lenient_int")]
    pub positive_points: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub negative_points: i64,
    #[serde(deserialize_with = "lenient")]
    pub positive_message: String,
    #[serde(deserialize_with = "lenient")]
    pub negative_message: String,
}

impl Service {
    pub fn default_state(&self) -> Option<ServiceState> {
        ServiceState::parse(&self.default_state)
    }

    pub fn desired_state(&self) -> Option<ServiceState> {
        ServiceState::parse(&self.desired_state)
    }
}

/// A Linux process; `true` states mean running.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Process {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub index: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub name: String,
    #[serde(deserialize_with = "lenient")]
    pub default_state: bool,
    #[serde(deserialize_with = "lenient")]
    pub desired_state: bool,
    #[serde(deserialize_with = "lenient")]
    pub create_dummy: bool,
    #[serde(deserialize_with = "lenient_int")]
    pub positive_points: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub negative_points: i64,
    #[serde(deserialize_with = "lenient")]
    pub positive_message: String,
    #[serde(deserialize_with = "lenient")]
    pub negative_message: String,
}

/// An installable program (Windows) or package (Linux).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Program {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub index: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub name: String,
    #[serde(deserialize_with = "lenient")]
    pub installed: bool,
    #[serde(deserialize_with = "lenient")]
    pub desired: bool,
    #[serde(deserialize_with = "lenient_int")]
    pub positive_points: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub negative_points: i64,
}

/// Linux packages share the program shape.
pub type Package = Program;

/// A Windows firewall profile; `true` states mean enabled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirewallProfile {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub index: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub name: String,
    #[serde(deserialize_with = "lenient")]
    pub starting_state: bool,
    #[serde(deserialize_with = "lenient")]
    pub desired_state: bool,
    #[serde(deserialize_with = "lenient_int")]
    pub positive_points: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub negative_points: i64,
}

/// A Windows registry value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryEntry {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub index: Option<f64>,
    /// Hive, e.g. `HKEY_LOCAL_MACHINE`.
    #[serde(deserialize_with = "lenient")]
    pub key: String,
    #[serde(deserialize_with = "lenient")]
    pub key_path: String,
    #[serde(deserialize_with = "lenient")]
    pub entry_name: String,
    #[serde(deserialize_with = "lenient")]
    pub default_value: String,
    #[serde(deserialize_with = "lenient")]
    pub positive_value: String,
    #[serde(deserialize_with = "lenient")]
    pub negative_value: String,
    #[serde(deserialize_with = "lenient_int")]
    pub positive_points: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub negative_points: i64,
    #[serde(deserialize_with = "lenient")]
    pub create: bool,
    #[serde(deserialize_with = "lenient")]
    pub positive_message: String,
    #[serde(deserialize_with = "lenient")]
    pub negative_message: String,
}

/// A value inside a Linux configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFileCheck {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub index: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub filepath: String,
    #[serde(deserialize_with = "lenient")]
    pub default_value: String,
    #[serde(deserialize_with = "lenient")]
    pub positive_value: String,
    #[serde(deserialize_with = "lenient")]
    pub negative_value: String,
    #[serde(deserialize_with = "lenient_int")]
    pub positive_points: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub negative_points: i64,
    #[serde(deserialize_with = "lenient")]
    pub create: bool,
    #[serde(deserialize_with = "lenient")]
    pub positive_message: String,
    #[serde(deserialize_with = "lenient")]
    pub negative_message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_tags_and_parse() {
        assert_eq!(Os::from_tag("Linux"), Some(Os::Linux));
        assert_eq!(Os::from_tag("linux"), None);
        assert_eq!(Os::Windows.to_string(), "Windows");
        assert_eq!("LINUX".parse::<Os>().unwrap(), Os::Linux);
        assert_eq!("win".parse::<Os>().unwrap(), Os::Windows);
        assert!("macos".parse::<Os>().is_err());
    }

    #[test]
    fn evaluation_order_starts_with_shared_categories() {
        for os in [Os::Linux, Os::Windows] {
            let order = Category::evaluation_order(os);
            assert_eq!(&order[..2], &[Category::Questions, Category::Filepaths]);
        }
        assert!(Category::Services.applies_to(Os::Windows));
        assert!(!Category::Services.applies_to(Os::Linux));
        assert!(Category::ConfigFiles.applies_to(Os::Linux));
    }

    #[test]
    fn reads_editor_keys_and_aliases() {
        let json = r#"{
            "format": "DarkBlue",
            "OS": "Linux",
            "score": 40,
            "readme": "",
            "questions": [{"name": "Q1", "answer": "42", "points": 2}],
            "configfiles": [{"filepath": "/etc/ssh/sshd_config", "default_value": "yes"}]
        }"#;
        let doc: ConfigurationDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.platform(), Some(Os::Linux));
        assert_eq!(doc.questions.as_ref().unwrap()[0].answer.as_deref(), Some("42"));
        assert_eq!(doc.config_files.as_ref().unwrap().len(), 1);
        assert!(doc.users.is_none());
    }

    #[test]
    fn malformed_category_list_is_treated_as_absent() {
        let json = r#"{"format": "DarkBlue", "OS": "Windows", "services": "oops", "users": []}"#;
        let doc: ConfigurationDocument = serde_json::from_str(json).unwrap();
        assert!(doc.services.is_none());
        assert_eq!(doc.users, Some(vec![]));
    }

    #[test]
    fn null_and_ill_typed_fields_take_defaults() {
        let json = r#"{"users": [
            {"name": "bob", "allowed": null, "positive_points": "7", "negative_points": null},
            {"name": "eve", "allowed": false, "positive_points": 5.0, "is_sudo": "yes"},
            42
        ]}"#;
        let doc: ConfigurationDocument = serde_json::from_str(json).unwrap();
        let users = doc.users.unwrap();
        assert_eq!(users.len(), 2);
        assert!(!users[0].allowed);
        assert_eq!(users[0].positive_points, 7);
        assert_eq!(users[0].negative_points, 0);
        assert_eq!(users[1].positive_points, 5);
        assert_eq!(users[1].is_sudo, None);
    }

    #[test]
    fn non_string_header_values_are_kept_as_text() {
        let json = r#"{"format": 1, "OS": null, "score": "12", "readme": null}"#;
        let doc: ConfigurationDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.format.as_deref(), Some("1"));
        assert_eq!(doc.os, None);
        assert_eq!(doc.score, 12);
        assert_eq!(doc.readme, "");
    }

    #[test]
    fn missing_entry_fields_take_editor_defaults() {
        let json = r#"{"users": [{"name": "bob"}]}"#;
        let doc: ConfigurationDocument = serde_json::from_str(json).unwrap();
        let user = &doc.users.unwrap()[0];
        assert!(!user.allowed);
        assert_eq!(user.positive_points, 0);
        assert_eq!(user.privilege(Os::Linux), (false, false));
    }

    #[test]
    fn unknown_attributes_survive_a_round_trip() {
        let json = r#"{"format": "DarkBlue", "OS": "Linux", "theme": "dark"}"#;
        let doc: ConfigurationDocument = serde_json::from_str(json).unwrap();
        let back = serde_json::to_value(&doc).unwrap();
        assert_eq!(back["theme"], "dark");
        assert_eq!(back["OS"], "Linux");
    }

    #[test]
    fn new_document_has_marker_and_os_lists() {
        let doc = ConfigurationDocument::new(Os::Windows);
        assert_eq!(doc.format.as_deref(), Some(FORMAT_MARKER));
        assert_eq!(doc.platform(), Some(Os::Windows));
        assert_eq!(doc.firewall_profiles.as_ref().map(Vec::len), Some(3));
        assert!(doc.processes.is_none());
        assert!(doc.entries(Category::Services, Os::Windows).unwrap().is_empty());
    }

    #[test]
    fn service_state_parse() {
        assert_eq!(ServiceState::parse("Running"), Some(ServiceState::Running));
        assert_eq!(ServiceState::parse(" stopped "), Some(ServiceState::Stopped));
        assert_eq!(ServiceState::parse(""), None);
    }
}
