// Drives the compiled binary through a PTY: real event loop, crossterm
// input and mouse capture.
//
// Notes:
// - Requires a TTY; uses expectrl which allocates a pseudo terminal.
// - Marked Unix-only and ignored by default to avoid CI/platform issues.
// - Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn minimal_session_submits_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("gridplot");
    let activity = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("activities")
        .join("reflect_x_001.json");
    let cmd = format!("{} {}", bin.display(), activity.display());

    let mut p = spawn(cmd)?;

    std::thread::sleep(Duration::from_millis(200));

    // Left press at column 40, row 12 (SGR mouse encoding, 1-based)
    p.send("\x1b[<0;41;13M")?;
    std::thread::sleep(Duration::from_millis(100));

    // undo, submit
    p.send("u")?;
    p.send("\r")?;
    std::thread::sleep(Duration::from_millis(200));

    p.send("\x1b")?; // ESC

    p.expect(Eof)?;
    Ok(())
}
