//! C ABI exported by toolkit bridge libraries.
//!
//! A primary bridge exports [`PRIMARY_ENTRY_SYMBOL`], a compat bridge
//! exports [`COMPAT_ENTRY_SYMBOL`]. Both return a pointer to a static,
//! read-only function table. Handles are opaque to the host.

use std::{ffi::c_void, slice};

pub const TOOLKIT_ABI_VERSION: u32 = 1;

pub const PRIMARY_ENTRY_SYMBOL: &[u8] = b"hostshell_toolkit_v1\0";
pub const COMPAT_ENTRY_SYMBOL: &[u8] = b"hostshell_compat_toolkit_v1\0";

pub type Handle = *mut c_void;

/// Borrowed UTF-8 string passed across the boundary.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct TkStr {
    pub ptr: *const u8,
    pub len: usize,
}

impl TkStr {
    /// Borrows `value` for the duration of a call.
    pub fn borrowed(value: &str) -> Self {
        Self {
            ptr: value.as_ptr(),
            len: value.len(),
        }
    }

    /// Copies the string out of the bridge's memory.
    ///
    /// # Safety
    /// `ptr` must be null or point to `len` readable bytes.
    pub unsafe fn to_owned_lossy(self) -> String {
        if self.ptr.is_null() {
            return String::new();
        }
        // SAFETY: upheld by the caller.
        let bytes = unsafe { slice::from_raw_parts(self.ptr, self.len) };
        String::from_utf8_lossy(bytes).into_owned()
    }
}

/// Table returned by a primary bridge.
#[repr(C)]
pub struct PrimaryToolkitV1 {
    pub abi_version: u32,
    pub dialog_base: TkStr,
    pub application_new: Option<extern "C" fn() -> Handle>,
    pub application_exec: Option<extern "C" fn(app: Handle) -> i32>,
    pub widget_new: Option<extern "C" fn(class: TkStr, title: TkStr, owner: TkStr, args_json: TkStr) -> Handle>,
    pub widget_show: Option<extern "C" fn(widget: Handle)>,
    pub widget_exec: Option<extern "C" fn(widget: Handle) -> i32>,
    pub widget_release: Option<extern "C" fn(widget: Handle)>,
}

pub type PrimaryEntry = unsafe extern "C" fn() -> *const PrimaryToolkitV1;

/// Table returned by a compat bridge. Same capabilities, different names,
/// and the caption is set separately from construction.
#[repr(C)]
pub struct CompatToolkitV1 {
    pub version: u32,
    pub base_dialog_name: TkStr,
    pub app_create: Option<extern "C" fn() -> Handle>,
    pub app_run: Option<extern "C" fn(app: Handle) -> i32>,
    pub window_create: Option<extern "C" fn(class: TkStr, owner: TkStr, args_json: TkStr) -> Handle>,
    pub window_set_caption: Option<extern "C" fn(window: Handle, caption: TkStr)>,
    pub window_present: Option<extern "C" fn(window: Handle)>,
    pub window_run_modal: Option<extern "C" fn(window: Handle) -> i32>,
    pub window_destroy: Option<extern "C" fn(window: Handle)>,
}

pub type CompatEntry = unsafe extern "C" fn() -> *const CompatToolkitV1;
