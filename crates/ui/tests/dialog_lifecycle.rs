use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use hostshell_types::{DialogCode, DialogError, DialogOwner, DialogRequest, Widget, WidgetClass, WidgetHandle};
use hostshell_ui::{
    BindingKind, DialogController, EventLoop, LoopState, ProbeError, ProbeState, ToolkitBinding, ToolkitCandidate,
    ToolkitCore, ToolkitGui,
};

type Journal = Rc<RefCell<Vec<String>>>;
type LoopHook = Rc<RefCell<Option<Box<dyn FnOnce()>>>>;

struct FakeCandidate {
    kind: BindingKind,
    available: bool,
    imports: Rc<Cell<usize>>,
    journal: Journal,
    hook: LoopHook,
}

impl FakeCandidate {
    fn new(kind: BindingKind, available: bool, journal: &Journal) -> Self {
        Self {
            kind,
            available,
            imports: Rc::new(Cell::new(0)),
            journal: Rc::clone(journal),
            hook: Rc::new(RefCell::new(None)),
        }
    }
}

impl ToolkitCandidate for FakeCandidate {
    fn kind(&self) -> BindingKind {
        self.kind
    }

    fn import(&self) -> Result<ToolkitBinding, ProbeError> {
        self.imports.set(self.imports.get() + 1);
        self.journal.borrow_mut().push(format!("import {}", self.kind));
        if !self.available {
            return Err(ProbeError::Unavailable(format!("{} not installed", self.kind)));
        }
        Ok(ToolkitBinding {
            kind: self.kind,
            core: Rc::new(FakeCore {
                journal: Rc::clone(&self.journal),
                hook: Rc::clone(&self.hook),
            }),
            gui: Rc::new(FakeGui {
                journal: Rc::clone(&self.journal),
            }),
            dialog_base_type: "QDialog".to_string(),
        })
    }
}

struct FakeCore {
    journal: Journal,
    hook: LoopHook,
}

impl ToolkitCore for FakeCore {
    fn create_event_loop(&self) -> Result<Rc<dyn EventLoop>, DialogError> {
        self.journal.borrow_mut().push("create_loop".to_string());
        Ok(Rc::new(FakeLoop {
            journal: Rc::clone(&self.journal),
            hook: Rc::clone(&self.hook),
        }))
    }
}

struct FakeLoop {
    journal: Journal,
    hook: LoopHook,
}

impl EventLoop for FakeLoop {
    fn exec(&self) -> i32 {
        self.journal.borrow_mut().push("exec_loop".to_string());
        let hook = self.hook.borrow_mut().take();
        if let Some(hook) = hook {
            hook();
        }
        self.journal.borrow_mut().push("loop_exit".to_string());
        0
    }
}

struct FakeGui {
    journal: Journal,
}

impl ToolkitGui for FakeGui {
    fn construct(&self, request: &DialogRequest) -> Result<WidgetHandle, DialogError> {
        self.journal
            .borrow_mut()
            .push(format!("construct {} '{}'", request.widget_class.name, request.title));
        if request.widget_class.name == "Broken" {
            return Err(DialogError::Toolkit("cannot construct Broken".to_string()));
        }
        Ok(Rc::new(FakeWidget {
            journal: Rc::clone(&self.journal),
            class_name: request.widget_class.name.clone(),
        }))
    }
}

struct FakeWidget {
    journal: Journal,
    class_name: String,
}

impl Widget for FakeWidget {
    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn show(&self) {
        self.journal.borrow_mut().push(format!("show {}", self.class_name));
    }

    fn exec(&self) -> DialogCode {
        self.journal.borrow_mut().push(format!("exec {}", self.class_name));
        DialogCode::Accepted
    }
}

fn request(class: &str) -> DialogRequest {
    DialogRequest::new(
        format!("{class} title"),
        DialogOwner::new("tk-multi-demo"),
        WidgetClass::new(class).deriving("QDialog"),
    )
}

fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

fn entries(journal: &Journal) -> Vec<String> {
    journal.borrow().clone()
}

fn count(journal: &Journal, entry: &str) -> usize {
    journal.borrow().iter().filter(|line| line.as_str() == entry).count()
}

#[test]
fn probe_runs_once_and_is_memoized() {
    let log = journal();
    let primary = FakeCandidate::new(BindingKind::Primary, true, &log);
    let imports = Rc::clone(&primary.imports);
    let controller = DialogController::new(vec![Box::new(primary)]);

    assert_eq!(controller.probe_state(), ProbeState::Unprobed);
    assert!(controller.has_ui());
    assert!(controller.has_ui());
    assert_eq!(controller.probe().map(|binding| binding.kind), Some(BindingKind::Primary));
    assert_eq!(imports.get(), 1);
    assert_eq!(controller.probe_state(), ProbeState::ToolkitFound(BindingKind::Primary));
}

#[test]
fn probe_falls_through_to_compat_binding() {
    let log = journal();
    let primary = FakeCandidate::new(BindingKind::Primary, false, &log);
    let compat = FakeCandidate::new(BindingKind::Compat, true, &log);
    let controller = DialogController::new(vec![Box::new(primary), Box::new(compat)]);

    assert_eq!(controller.probe().map(|binding| binding.kind), Some(BindingKind::Compat));
    assert_eq!(entries(&log), vec!["import primary", "import compat"]);
}

#[test]
fn primary_binding_is_preferred_regardless_of_order() {
    let log = journal();
    let compat = FakeCandidate::new(BindingKind::Compat, true, &log);
    let compat_imports = Rc::clone(&compat.imports);
    let primary = FakeCandidate::new(BindingKind::Primary, true, &log);
    let controller = DialogController::new(vec![Box::new(compat), Box::new(primary)]);

    assert_eq!(controller.probe().map(|binding| binding.kind), Some(BindingKind::Primary));
    assert_eq!(compat_imports.get(), 0);
}

#[test]
fn missing_toolkit_fails_fast_without_reprobing() {
    let log = journal();
    let primary = FakeCandidate::new(BindingKind::Primary, false, &log);
    let compat = FakeCandidate::new(BindingKind::Compat, false, &log);
    let primary_imports = Rc::clone(&primary.imports);
    let compat_imports = Rc::clone(&compat.imports);
    let controller = DialogController::new(vec![Box::new(primary), Box::new(compat)]);

    assert_eq!(controller.show_non_blocking(&request("Publish")).err(), Some(DialogError::NoToolkit));
    assert_eq!(controller.show_blocking(&request("Publish")).err(), Some(DialogError::NoToolkit));
    assert!(!controller.has_ui());
    assert_eq!(controller.probe_state(), ProbeState::NoToolkit);
    assert_eq!((primary_imports.get(), compat_imports.get()), (1, 1));
    assert_eq!(controller.loop_state(), LoopState::NoLoop);
    assert_eq!(entries(&log), vec!["import primary", "import compat"]);
}

#[test]
fn headless_controller_reports_no_toolkit() {
    let controller = DialogController::headless();
    assert!(!controller.has_ui());
    assert_eq!(controller.show_blocking(&request("Publish")).err(), Some(DialogError::NoToolkit));
}

#[test]
fn first_non_blocking_dialog_owns_the_loop() {
    let log = journal();
    let controller = DialogController::new(vec![Box::new(FakeCandidate::new(BindingKind::Primary, true, &log))]);

    let handle = controller.show_non_blocking(&request("Publish")).expect("dialog shown");
    assert!(handle.is_none());
    assert_eq!(
        entries(&log),
        vec![
            "import primary",
            "create_loop",
            "construct Publish 'Publish title'",
            "show Publish",
            "exec_loop",
            "loop_exit",
        ]
    );
    assert_eq!(controller.loop_state(), LoopState::Exited);
}

#[test]
fn blocking_without_loop_behaves_like_non_blocking() {
    let non_blocking_log = journal();
    let non_blocking =
        DialogController::new(vec![Box::new(FakeCandidate::new(BindingKind::Primary, true, &non_blocking_log))]);
    let blocking_log = journal();
    let blocking = DialogController::new(vec![Box::new(FakeCandidate::new(BindingKind::Primary, true, &blocking_log))]);

    assert!(non_blocking.show_non_blocking(&request("Publish")).expect("shown").is_none());
    assert!(blocking.show_blocking(&request("Publish")).expect("shown").is_none());
    assert_eq!(entries(&non_blocking_log), entries(&blocking_log));
}

#[test]
fn dialogs_inside_the_running_loop_do_not_create_another_loop() {
    let log = journal();
    let candidate = FakeCandidate::new(BindingKind::Primary, true, &log);
    let hook = Rc::clone(&candidate.hook);
    let controller = Rc::new(DialogController::new(vec![Box::new(candidate)]));

    let nested_results: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    {
        let controller = Rc::clone(&controller);
        let results = Rc::clone(&nested_results);
        *hook.borrow_mut() = Some(Box::new(move || {
            results.borrow_mut().push(format!("{:?}", controller.loop_state()));
            let handle = controller.show_non_blocking(&request("Details")).expect("nested dialog");
            results
                .borrow_mut()
                .push(handle.map(|widget| widget.class_name().to_string()).unwrap_or_default());
            let (code, widget) = controller
                .show_blocking(&request("Confirm"))
                .expect("nested modal")
                .expect("modal runs inside the loop");
            results.borrow_mut().push(format!("{} {:?}", widget.class_name(), code));
        }));
    }

    assert!(controller.show_non_blocking(&request("Publish")).expect("shown").is_none());
    assert_eq!(*nested_results.borrow(), vec!["Running", "Details", "Confirm Accepted"]);
    assert_eq!(count(&log, "create_loop"), 1);
    assert_eq!(count(&log, "exec_loop"), 1);
    assert_eq!(count(&log, "show Details"), 1);
    assert_eq!(count(&log, "exec Confirm"), 1);
    assert_eq!(controller.loop_state(), LoopState::Exited);
}

#[test]
fn exited_loop_is_reentered_not_recreated() {
    let log = journal();
    let controller = DialogController::new(vec![Box::new(FakeCandidate::new(BindingKind::Primary, true, &log))]);

    controller.show_non_blocking(&request("Publish")).expect("first");
    controller.show_blocking(&request("Loader")).expect("second");
    assert_eq!(count(&log, "create_loop"), 1);
    assert_eq!(count(&log, "exec_loop"), 2);
    assert_eq!(count(&log, "exec Loader"), 0);
}

#[test]
fn failed_first_construction_leaves_a_loop_that_never_ran() {
    let log = journal();
    let controller = DialogController::new(vec![Box::new(FakeCandidate::new(BindingKind::Primary, true, &log))]);

    assert_eq!(
        controller.show_non_blocking(&request("Broken")).err(),
        Some(DialogError::Toolkit("cannot construct Broken".to_string()))
    );
    assert_eq!(controller.loop_state(), LoopState::Created);
    assert_eq!(count(&log, "exec_loop"), 0);

    assert!(controller.show_non_blocking(&request("Publish")).expect("shown").is_none());
    assert_eq!(controller.loop_state(), LoopState::Exited);
    assert_eq!(count(&log, "create_loop"), 1);
    assert_eq!(count(&log, "exec_loop"), 1);
}

#[test]
fn widget_classes_must_derive_from_the_dialog_base() {
    let log = journal();
    let controller = DialogController::new(vec![Box::new(FakeCandidate::new(BindingKind::Primary, true, &log))]);
    let window = DialogRequest::new("Main", DialogOwner::new("tk-multi-demo"), WidgetClass::new("QMainWindow"));

    assert_eq!(
        controller.show_non_blocking(&window).err(),
        Some(DialogError::NotADialog {
            class: "QMainWindow".to_string(),
            base: "QDialog".to_string(),
        })
    );
    assert_eq!(controller.loop_state(), LoopState::NoLoop);
    assert_eq!(entries(&log), vec!["import primary"]);
}
