use hackdesk_lib::input_handler::spatial::{clamp_size, compute_drag, compute_resize, MIN_HEIGHT, MIN_WIDTH};
use hackdesk_lib::input_handler::{GeometryPatch, Rect, ResizeEdge, Viewport};
use hackdesk_lib::{AppRegistry, WindowContext, WindowStore};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Open(usize),
    OpenFile(usize),
    Close(usize),
    Minimize(usize),
    Restore(usize),
    Focus(usize),
    Taskbar(usize),
    ToggleMaximize(usize),
    Install(usize),
    Remove(usize),
    Geometry(usize, f64, f64, f64, f64),
}

fn app_ids() -> Vec<String> {
    AppRegistry::with_defaults()
        .apps()
        .map(|app| app.id.clone())
        .collect()
}

fn coordinate() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => -500.0..2000.0f64,
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    let idx = 0..17usize;
    prop_oneof![
        (idx.clone(), any::<bool>()).prop_map(|(i, file)| if file { Op::OpenFile(i) } else { Op::Open(i) }),
        idx.clone().prop_map(Op::Close),
        idx.clone().prop_map(Op::Minimize),
        idx.clone().prop_map(Op::Restore),
        idx.clone().prop_map(Op::Focus),
        idx.clone().prop_map(Op::Taskbar),
        idx.clone().prop_map(Op::ToggleMaximize),
        idx.clone().prop_map(Op::Install),
        idx.clone().prop_map(Op::Remove),
        (idx, coordinate(), coordinate(), coordinate(), coordinate())
            .prop_map(|(i, x, y, w, h)| Op::Geometry(i, x, y, w, h)),
    ]
}

fn viewport() -> Viewport {
    Viewport::new(1280.0, 830.0, 30.0, 100.0)
}

/// Rejections are part of the model; only the resulting state is checked
fn apply(store: &mut WindowStore, ids: &[String], op: &Op) {
    let vp = viewport();
    let _ = match op {
        Op::Open(i) => store.open(&ids[*i], None, &vp),
        Op::OpenFile(i) => store.open(&ids[*i], Some(WindowContext::file(&["root", "notes.txt"])), &vp),
        Op::Close(i) => store.close(&ids[*i]),
        Op::Minimize(i) => store.minimize(&ids[*i]),
        Op::Restore(i) => store.restore(&ids[*i]),
        Op::Focus(i) => {
            store.focus(&ids[*i]);
            Ok(())
        }
        Op::Taskbar(i) => store.taskbar_click(&ids[*i], &vp).map(|_| ()),
        Op::ToggleMaximize(i) => store.toggle_maximize(&ids[*i], &vp).map(|_| ()),
        Op::Install(i) => store.install(&ids[*i]),
        Op::Remove(i) => store.remove_app(&ids[*i]),
        Op::Geometry(i, x, y, w, h) => store
            .update_geometry(
                &ids[*i],
                GeometryPatch {
                    x: Some(*x),
                    y: Some(*y),
                    width: Some(*w),
                    height: Some(*h),
                },
            )
            .map(|_| ()),
    };
}

proptest! {
    #[test]
    fn test_store_invariants_hold_after_any_sequence(ops in prop::collection::vec(op(), 0..60)) {
        let ids = app_ids();
        let mut store = WindowStore::default().with_seed(5);
        for op in &ops {
            apply(&mut store, &ids, op);

            for win in store.windows() {
                prop_assert!(!win.is_minimized || win.is_open, "{} minimized while closed", win.id);
                if let Some(rect) = win.geometry {
                    prop_assert!(rect.is_well_formed(), "{} has malformed geometry {:?}", win.id, rect);
                }
            }
            let mut stacked: Vec<&str> = store.stack().iter().collect();
            let mut visible: Vec<&str> = store
                .windows()
                .filter(|w| w.is_open && !w.is_minimized)
                .map(|w| w.id.as_str())
                .collect();
            stacked.sort_unstable();
            visible.sort_unstable();
            prop_assert_eq!(stacked, visible);
        }
    }

    #[test]
    fn test_focus_is_idempotent(ops in prop::collection::vec(op(), 0..30), target in 0..17usize) {
        let ids = app_ids();
        let mut store = WindowStore::default().with_seed(5);
        for op in &ops {
            apply(&mut store, &ids, op);
        }
        store.focus(&ids[target]);
        let once = store.stack().clone();
        store.focus(&ids[target]);
        prop_assert_eq!(store.stack(), &once);
    }

    #[test]
    fn test_same_inputs_same_layout(ops in prop::collection::vec(op(), 0..40)) {
        let ids = app_ids();
        let mut a = WindowStore::default().with_seed(21);
        let mut b = WindowStore::default().with_seed(21);
        for op in &ops {
            apply(&mut a, &ids, op);
            apply(&mut b, &ids, op);
        }
        prop_assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_snapshot_reload_preserves_layout(ops in prop::collection::vec(op(), 0..40)) {
        let ids = app_ids();
        let mut store = WindowStore::default().with_seed(8);
        for op in &ops {
            apply(&mut store, &ids, op);
        }
        let snapshot = store.snapshot();
        let mut reloaded = WindowStore::default().with_seed(9);
        reloaded.load_snapshot(&snapshot, &viewport());

        prop_assert_eq!(reloaded.stack(), store.stack());
        for win in store.windows() {
            let other = reloaded.get(&win.id).unwrap();
            prop_assert_eq!(other.is_open, win.is_open);
            prop_assert_eq!(other.is_minimized, win.is_minimized);
            prop_assert_eq!(other.is_maximized, win.is_maximized);
            if win.geometry.is_some() {
                prop_assert_eq!(other.geometry, win.geometry);
            }
        }
    }

    #[test]
    fn test_clamp_never_below_minimum(w in -1.0e6..1.0e6f64, h in -1.0e6..1.0e6f64) {
        let (cw, ch) = clamp_size(w, h);
        prop_assert!(cw >= MIN_WIDTH && ch >= MIN_HEIGHT);
        prop_assert!(cw == w || cw == MIN_WIDTH);
        prop_assert!(ch == h || ch == MIN_HEIGHT);
    }

    #[test]
    fn test_drag_is_deterministic(
        x in -200.0..1400.0f64,
        y in -200.0..900.0f64,
        dx in -600.0..600.0f64,
        dy in -600.0..600.0f64,
        sx in 0.0..1000.0f64,
    ) {
        let origin = Rect::new(x, y, 400.0, 300.0);
        let siblings = [Rect::new(sx, 100.0, 300.0, 250.0), Rect::new(50.0, sx / 2.0, 350.0, 300.0)];
        let first = compute_drag(&origin, (dx, dy), &siblings, &viewport(), 15.0);
        let second = compute_drag(&origin, (dx, dy), &siblings, &viewport(), 15.0);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_resize_keeps_opposite_edge(dx in -800.0..800.0f64, dy in -800.0..800.0f64) {
        let origin = Rect::new(200.0, 150.0, 500.0, 400.0);
        let rect = compute_resize(&origin, (dx, dy), ResizeEdge::TopLeft, MIN_WIDTH, MIN_HEIGHT);
        prop_assert!(rect.width >= MIN_WIDTH && rect.height >= MIN_HEIGHT);
        prop_assert!((rect.right() - origin.right()).abs() < 1e-9);
        prop_assert!((rect.bottom() - origin.bottom()).abs() < 1e-9);
    }
}
