//! Process-wide key configuration swaps.
//!
//! Lives in its own test binary: replacing the global configuration would
//! otherwise race every test that relies on the default codes.

use lrud::key_config::{self, KeyConfig};
use lrud::{Key, KeyEvent, KeyOutcome, Lrud, NodeAttrs};

fn list() -> Lrud {
    let mut nav = Lrud::new();
    nav.register("list", NodeAttrs::new().horizontal()).unwrap();
    nav.register("a", NodeAttrs::child_of("list")).unwrap();
    nav.register("b", NodeAttrs::child_of("list")).unwrap();
    nav.focus(None).unwrap();
    nav
}

#[test]
fn swapping_global_config_affects_live_engines() {
    let mut first = list();
    let mut second = list();

    // Remote control codes: 0x15 = right, 0x14 = left, 0x0d stays enter.
    key_config::set_key_config(
        KeyConfig::empty()
            .with_code(0x15, "RIGHT")
            .with_code(0x14, "LEFT")
            .with_code(13, "ENTER")
            .with_key("RIGHT", Key::Right)
            .with_key("LEFT", Key::Left)
            .with_key("ENTER", Key::Enter),
    );

    for nav in [&mut first, &mut second] {
        assert_eq!(
            nav.handle_key_event(&mut KeyEvent::new(39)),
            KeyOutcome::Unhandled
        );
        assert!(matches!(
            nav.handle_key_event(&mut KeyEvent::new(0x15)),
            KeyOutcome::Moved { .. }
        ));
        assert_eq!(nav.current_focus(), Some("b"));
    }

    // Rebinding a name re-targets every code mapped to it.
    key_config::update_key_config(|cfg| {
        cfg.keys.insert("RIGHT".into(), Key::Left);
    });
    first.handle_key_event(&mut KeyEvent::new(0x15));
    assert_eq!(first.current_focus(), Some("a"));

    key_config::reset_key_config();
    assert_eq!(key_config::key_config(), KeyConfig::default());
    second.handle_key_event(&mut KeyEvent::new(37));
    assert_eq!(second.current_focus(), Some("a"));
}
