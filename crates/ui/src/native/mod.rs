//! Toolkit bridges loaded from shared libraries.
//!
//! A bridge library wraps a real GUI toolkit behind the small C ABI in
//! [`abi`]. Two flavours exist: primary bridges, and compat bridges whose
//! table uses a different naming scheme and is adapted by a shim. Nothing
//! is linked at build time; a process without any bridge installed simply
//! runs headless.

pub mod abi;
mod table;

use std::rc::Rc;

use hostshell_types::{DialogCode, DialogError, DialogRequest, Widget, WidgetHandle};
use libloading::{Library, Symbol};
use tracing::debug;

use self::{
    abi::{COMPAT_ENTRY_SYMBOL, CompatEntry, CompatToolkitV1, Handle, PRIMARY_ENTRY_SYMBOL, PrimaryEntry, PrimaryToolkitV1},
    table::{CompatShim, NativeTable, PrimaryTable},
};
use crate::{
    probe::{ProbeError, ToolkitCandidate},
    toolkit::{BindingKind, EventLoop, ToolkitBinding, ToolkitCore, ToolkitGui},
};

struct NativeToolkit<T> {
    table: T,
    // Keeps the function table mapped while any handle is alive. `None`
    // for tables linked into the process.
    _library: Option<Library>,
}

fn into_binding<T: NativeTable + 'static>(kind: BindingKind, table: T, library: Option<Library>) -> ToolkitBinding {
    let dialog_base_type = table.dialog_base().to_string();
    let toolkit = Rc::new(NativeToolkit {
        table,
        _library: library,
    });
    ToolkitBinding {
        kind,
        core: Rc::new(NativeCore(Rc::clone(&toolkit))),
        gui: Rc::new(NativeGui(toolkit)),
        dialog_base_type,
    }
}

struct NativeCore<T>(Rc<NativeToolkit<T>>);

impl<T: NativeTable + 'static> ToolkitCore for NativeCore<T> {
    fn create_event_loop(&self) -> Result<Rc<dyn EventLoop>, DialogError> {
        let app = self.0.table.application_new();
        if app.is_null() {
            return Err(DialogError::Toolkit("the toolkit could not create an application".to_string()));
        }
        Ok(Rc::new(NativeEventLoop {
            toolkit: Rc::clone(&self.0),
            app,
        }))
    }
}

struct NativeEventLoop<T> {
    toolkit: Rc<NativeToolkit<T>>,
    app: Handle,
}

impl<T: NativeTable> EventLoop for NativeEventLoop<T> {
    fn exec(&self) -> i32 {
        self.toolkit.table.application_exec(self.app)
    }
}

struct NativeGui<T>(Rc<NativeToolkit<T>>);

impl<T: NativeTable + 'static> ToolkitGui for NativeGui<T> {
    fn construct(&self, request: &DialogRequest) -> Result<WidgetHandle, DialogError> {
        let args_json =
            serde_json::to_string(&request.args).map_err(|error| DialogError::Toolkit(error.to_string()))?;
        let handle = self.0.table.widget_new(
            &request.widget_class.name,
            &request.title,
            &request.owner.name,
            &args_json,
        );
        if handle.is_null() {
            return Err(DialogError::Toolkit(format!(
                "the toolkit could not construct {}",
                request.widget_class
            )));
        }
        Ok(Rc::new(NativeWidget {
            toolkit: Rc::clone(&self.0),
            handle,
            class_name: request.widget_class.name.clone(),
        }))
    }
}

struct NativeWidget<T: NativeTable> {
    toolkit: Rc<NativeToolkit<T>>,
    handle: Handle,
    class_name: String,
}

impl<T: NativeTable> Widget for NativeWidget<T> {
    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn show(&self) {
        self.toolkit.table.widget_show(self.handle);
    }

    fn exec(&self) -> DialogCode {
        DialogCode::from(self.toolkit.table.widget_exec(self.handle))
    }
}

impl<T: NativeTable> Drop for NativeWidget<T> {
    fn drop(&mut self) {
        self.toolkit.table.widget_release(self.handle);
    }
}

/// Binds a primary table linked into the process.
pub fn bind_static_primary(table: &'static PrimaryToolkitV1) -> Result<ToolkitBinding, ProbeError> {
    // SAFETY: a static table's strings live for the whole process.
    let table = unsafe { PrimaryTable::from_raw(table, "<static>") }?;
    Ok(into_binding(BindingKind::Primary, table, None))
}

/// Binds a compat table linked into the process.
pub fn bind_static_compat(table: &'static CompatToolkitV1) -> Result<ToolkitBinding, ProbeError> {
    // SAFETY: a static table's strings live for the whole process.
    let shim = unsafe { CompatShim::from_raw(table, "<static>") }?;
    Ok(into_binding(BindingKind::Compat, shim, None))
}

/// Candidate that loads a bridge library for one binding.
#[derive(Debug, Clone)]
pub struct NativeCandidate {
    kind: BindingKind,
    libraries: Vec<String>,
}

impl NativeCandidate {
    pub fn primary<I, S>(libraries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: BindingKind::Primary,
            libraries: libraries.into_iter().map(Into::into).collect(),
        }
    }

    pub fn compat<I, S>(libraries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: BindingKind::Compat,
            libraries: libraries.into_iter().map(Into::into).collect(),
        }
    }

    /// Both candidates, primary first.
    pub fn defaults(primary: &[String], compat: &[String]) -> Vec<Box<dyn ToolkitCandidate>> {
        vec![
            Box::new(NativeCandidate::primary(primary.iter().cloned())),
            Box::new(NativeCandidate::compat(compat.iter().cloned())),
        ]
    }

    fn bind(&self, library: Library, name: &str) -> Result<ToolkitBinding, ProbeError> {
        match self.kind {
            BindingKind::Primary => {
                let table = {
                    // SAFETY: the entry point is declared by the bridge ABI; the
                    // returned table is static data of the library, which stays
                    // loaded because `library` moves into the binding.
                    let entry: Symbol<PrimaryEntry> =
                        unsafe { library.get(PRIMARY_ENTRY_SYMBOL) }.map_err(|_| missing_symbol(name, PRIMARY_ENTRY_SYMBOL))?;
                    let raw = unsafe { entry().as_ref() }.ok_or_else(|| null_table(name))?;
                    unsafe { PrimaryTable::from_raw(raw, name) }?
                };
                Ok(into_binding(self.kind, table, Some(library)))
            }
            BindingKind::Compat => {
                let shim = {
                    // SAFETY: as above, for the compat entry point.
                    let entry: Symbol<CompatEntry> =
                        unsafe { library.get(COMPAT_ENTRY_SYMBOL) }.map_err(|_| missing_symbol(name, COMPAT_ENTRY_SYMBOL))?;
                    let raw = unsafe { entry().as_ref() }.ok_or_else(|| null_table(name))?;
                    unsafe { CompatShim::from_raw(raw, name) }?
                };
                Ok(into_binding(self.kind, shim, Some(library)))
            }
        }
    }
}

impl ToolkitCandidate for NativeCandidate {
    fn kind(&self) -> BindingKind {
        self.kind
    }

    fn import(&self) -> Result<ToolkitBinding, ProbeError> {
        if self.libraries.is_empty() {
            return Err(ProbeError::NotConfigured(self.kind));
        }

        let mut failures = Vec::new();
        for name in &self.libraries {
            // SAFETY: loading runs the library's initialisers; bridge
            // libraries are operator-configured and trusted.
            let attempt = match unsafe { Library::new(name) } {
                Ok(library) => self.bind(library, name),
                Err(error) => Err(ProbeError::Load {
                    library: name.clone(),
                    message: error.to_string(),
                }),
            };
            match attempt {
                Ok(binding) => return Ok(binding),
                Err(error) => {
                    debug!(binding = %self.kind, error = %error, "bridge library rejected");
                    failures.push(error);
                }
            }
        }

        if failures.len() == 1 {
            return Err(failures.remove(0));
        }
        let reasons: Vec<String> = failures.iter().map(ToString::to_string).collect();
        Err(ProbeError::Unavailable(reasons.join("; ")))
    }
}

fn missing_symbol(library: &str, symbol: &[u8]) -> ProbeError {
    ProbeError::MissingSymbol {
        library: library.to_string(),
        symbol: String::from_utf8_lossy(symbol.strip_suffix(b"\0").unwrap_or(symbol)).into_owned(),
    }
}

fn null_table(library: &str) -> ProbeError {
    ProbeError::IncompleteTable {
        library: library.to_string(),
        field: "table",
    }
}
