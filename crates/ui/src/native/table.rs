//! Validated function tables.
//!
//! [`NativeTable`] is the canonical set of operations the host needs from a
//! bridge. The primary table maps onto it one to one; [`CompatShim`]
//! translates the compat bridge's names and calling pattern.

use super::abi::{CompatToolkitV1, Handle, PrimaryToolkitV1, TOOLKIT_ABI_VERSION, TkStr};
use crate::probe::ProbeError;

pub(crate) trait NativeTable {
    fn dialog_base(&self) -> &str;
    fn application_new(&self) -> Handle;
    fn application_exec(&self, app: Handle) -> i32;
    fn widget_new(&self, class: &str, title: &str, owner: &str, args_json: &str) -> Handle;
    fn widget_show(&self, widget: Handle);
    fn widget_exec(&self, widget: Handle) -> i32;
    fn widget_release(&self, widget: Handle);
}

fn require<T>(field: Option<T>, library: &str, name: &'static str) -> Result<T, ProbeError> {
    field.ok_or_else(|| ProbeError::IncompleteTable {
        library: library.to_string(),
        field: name,
    })
}

fn check_version(found: u32, library: &str) -> Result<(), ProbeError> {
    if found == TOOLKIT_ABI_VERSION {
        Ok(())
    } else {
        Err(ProbeError::AbiMismatch {
            library: library.to_string(),
            expected: TOOLKIT_ABI_VERSION,
            found,
        })
    }
}

pub(crate) struct PrimaryTable {
    dialog_base: String,
    application_new: extern "C" fn() -> Handle,
    application_exec: extern "C" fn(Handle) -> i32,
    widget_new: extern "C" fn(TkStr, TkStr, TkStr, TkStr) -> Handle,
    widget_show: extern "C" fn(Handle),
    widget_exec: extern "C" fn(Handle) -> i32,
    widget_release: extern "C" fn(Handle),
}

impl PrimaryTable {
    /// # Safety
    /// `raw.dialog_base` must satisfy [`TkStr::to_owned_lossy`].
    pub(crate) unsafe fn from_raw(raw: &PrimaryToolkitV1, library: &str) -> Result<Self, ProbeError> {
        check_version(raw.abi_version, library)?;
        Ok(Self {
            // SAFETY: upheld by the caller.
            dialog_base: unsafe { raw.dialog_base.to_owned_lossy() },
            application_new: require(raw.application_new, library, "application_new")?,
            application_exec: require(raw.application_exec, library, "application_exec")?,
            widget_new: require(raw.widget_new, library, "widget_new")?,
            widget_show: require(raw.widget_show, library, "widget_show")?,
            widget_exec: require(raw.widget_exec, library, "widget_exec")?,
            widget_release: require(raw.widget_release, library, "widget_release")?,
        })
    }
}

impl NativeTable for PrimaryTable {
    fn dialog_base(&self) -> &str {
        &self.dialog_base
    }

    fn application_new(&self) -> Handle {
        (self.application_new)()
    }

    fn application_exec(&self, app: Handle) -> i32 {
        (self.application_exec)(app)
    }

    fn widget_new(&self, class: &str, title: &str, owner: &str, args_json: &str) -> Handle {
        (self.widget_new)(
            TkStr::borrowed(class),
            TkStr::borrowed(title),
            TkStr::borrowed(owner),
            TkStr::borrowed(args_json),
        )
    }

    fn widget_show(&self, widget: Handle) {
        (self.widget_show)(widget)
    }

    fn widget_exec(&self, widget: Handle) -> i32 {
        (self.widget_exec)(widget)
    }

    fn widget_release(&self, widget: Handle) {
        (self.widget_release)(widget)
    }
}

/// Presents a compat bridge through the canonical operations.
pub(crate) struct CompatShim {
    base_dialog_name: String,
    app_create: extern "C" fn() -> Handle,
    app_run: extern "C" fn(Handle) -> i32,
    window_create: extern "C" fn(TkStr, TkStr, TkStr) -> Handle,
    window_set_caption: extern "C" fn(Handle, TkStr),
    window_present: extern "C" fn(Handle),
    window_run_modal: extern "C" fn(Handle) -> i32,
    window_destroy: extern "C" fn(Handle),
}

impl CompatShim {
    /// # Safety
    /// `raw.base_dialog_name` must satisfy [`TkStr::to_owned_lossy`].
    pub(crate) unsafe fn from_raw(raw: &CompatToolkitV1, library: &str) -> Result<Self, ProbeError> {
        check_version(raw.version, library)?;
        Ok(Self {
            // SAFETY: upheld by the caller.
            base_dialog_name: unsafe { raw.base_dialog_name.to_owned_lossy() },
            app_create: require(raw.app_create, library, "app_create")?,
            app_run: require(raw.app_run, library, "app_run")?,
            window_create: require(raw.window_create, library, "window_create")?,
            window_set_caption: require(raw.window_set_caption, library, "window_set_caption")?,
            window_present: require(raw.window_present, library, "window_present")?,
            window_run_modal: require(raw.window_run_modal, library, "window_run_modal")?,
            window_destroy: require(raw.window_destroy, library, "window_destroy")?,
        })
    }
}

impl NativeTable for CompatShim {
    fn dialog_base(&self) -> &str {
        &self.base_dialog_name
    }

    fn application_new(&self) -> Handle {
        (self.app_create)()
    }

    fn application_exec(&self, app: Handle) -> i32 {
        (self.app_run)(app)
    }

    fn widget_new(&self, class: &str, title: &str, owner: &str, args_json: &str) -> Handle {
        let window = (self.window_create)(TkStr::borrowed(class), TkStr::borrowed(owner), TkStr::borrowed(args_json));
        if !window.is_null() {
            (self.window_set_caption)(window, TkStr::borrowed(title));
        }
        window
    }

    fn widget_show(&self, widget: Handle) {
        (self.window_present)(widget)
    }

    fn widget_exec(&self, widget: Handle) -> i32 {
        (self.window_run_modal)(widget)
    }

    fn widget_release(&self, widget: Handle) {
        (self.window_destroy)(widget)
    }
}
