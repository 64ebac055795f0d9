//! Dialog request types shared by commands and the dialog controller.

use std::{fmt, rc::Rc};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Describes the widget type a command wants constructed.
///
/// `ancestors` lists the toolkit types the widget derives from, nearest
/// first. The controller only constructs classes that derive from the
/// active binding's dialog base type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetClass {
    pub name: String,
    #[serde(default)]
    pub ancestors: Vec<String>,
}

impl WidgetClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ancestors: Vec::new(),
        }
    }

    /// Adds a base type to the ancestor chain.
    pub fn deriving(mut self, base: impl Into<String>) -> Self {
        self.ancestors.push(base.into());
        self
    }

    /// True when the class is `base` itself or lists it as an ancestor.
    pub fn derives_from(&self, base: &str) -> bool {
        self.name == base || self.ancestors.iter().any(|ancestor| ancestor == base)
    }
}

impl fmt::Display for WidgetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The app, engine or framework a dialog is associated with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogOwner {
    pub name: String,
}

impl DialogOwner {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Constructor arguments forwarded to the widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogArgs {
    #[serde(default)]
    pub positional: Vec<Value>,
    #[serde(default)]
    pub keyword: IndexMap<String, Value>,
}

/// Everything needed to put one dialog on screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogRequest {
    pub title: String,
    pub owner: DialogOwner,
    pub widget_class: WidgetClass,
    #[serde(default)]
    pub args: DialogArgs,
}

impl DialogRequest {
    pub fn new(title: impl Into<String>, owner: DialogOwner, widget_class: WidgetClass) -> Self {
        Self {
            title: title.into(),
            owner,
            widget_class,
            args: DialogArgs::default(),
        }
    }

    pub fn with_args(mut self, args: DialogArgs) -> Self {
        self.args = args;
        self
    }
}

/// Status returned by a modal dialog, following the usual toolkit
/// convention of `0` for rejected and `1` for accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogCode {
    Rejected,
    Accepted,
    Other(i32),
}

impl From<i32> for DialogCode {
    fn from(code: i32) -> Self {
        match code {
            0 => DialogCode::Rejected,
            1 => DialogCode::Accepted,
            other => DialogCode::Other(other),
        }
    }
}

impl From<DialogCode> for i32 {
    fn from(code: DialogCode) -> Self {
        match code {
            DialogCode::Rejected => 0,
            DialogCode::Accepted => 1,
            DialogCode::Other(other) => other,
        }
    }
}

/// A constructed toolkit widget.
pub trait Widget {
    /// Class the widget was constructed from.
    fn class_name(&self) -> &str;

    /// Show without blocking.
    fn show(&self);

    /// Show modally and block until the user closes the widget.
    fn exec(&self) -> DialogCode;
}

/// Shared handle to a constructed widget. Widgets live on the thread that
/// drives the interactive session, so the handle is not `Send`.
pub type WidgetHandle = Rc<dyn Widget>;

/// Failures surfaced by dialog operations. None of them are fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DialogError {
    #[error(
        "Cannot show dialog! No GUI toolkit support appears to exist in this environment. \
         Install one of the supported toolkit bindings to run UI based apps."
    )]
    NoToolkit,

    #[error("widget class '{class}' does not derive from the toolkit dialog base '{base}'")]
    NotADialog { class: String, base: String },

    #[error("toolkit error: {0}")]
    Toolkit(String),
}
