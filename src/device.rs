//! Device-boundary checks and operator confirmation.
//!
//! A move that stays on one device is a cheap rename and goes ahead silently.
//! A move across devices copies data, so the operator is asked first through a
//! [`Confirm`] provider. The terminal prompt blocks until a line is read.

use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing::debug;

use crate::platform::same_device_existing;

/// Answers "may `from` be moved to `to`?" for cross-device moves.
pub trait Confirm {
    fn confirm(&mut self, from: &Path, to: &Path) -> io::Result<bool>;
}

impl<F> Confirm for F
where
    F: FnMut(&Path, &Path) -> bool,
{
    fn confirm(&mut self, from: &Path, to: &Path) -> io::Result<bool> {
        Ok(self(from, to))
    }
}

/// Accept every cross-device move without asking (`--yes`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, from: &Path, to: &Path) -> io::Result<bool> {
        debug!(from = %from.display(), to = %to.display(), "cross-device move auto-confirmed");
        Ok(true)
    }
}

/// Interactive y/N prompt over any reader/writer pair.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Confirm for TerminalPrompt<R, W> {
    fn confirm(&mut self, from: &Path, to: &Path) -> io::Result<bool> {
        write!(
            self.output,
            "{} -> {} is on a different device. Move it? [y/N] ",
            from.display(),
            to.display()
        )?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            // EOF: nobody is there to say yes
            writeln!(self.output)?;
            return Ok(false);
        }
        Ok(matches!(
            line.trim().to_ascii_lowercase().as_str(),
            "y" | "yes"
        ))
    }
}

/// Whether `a` and `b` live on the same device. A path that does not exist yet
/// is judged by its nearest existing ancestor.
pub fn same_device(a: &Path, b: &Path) -> io::Result<bool> {
    same_device_existing(existing_ancestor(a)?, existing_ancestor(b)?)
}

fn existing_ancestor(path: &Path) -> io::Result<&Path> {
    path.ancestors()
        .find(|p| !p.as_os_str().is_empty() && p.exists())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no existing ancestor for '{}'", path.display()),
            )
        })
}

type DeviceCheck = fn(&Path, &Path) -> io::Result<bool>;

/// Gatekeeper for every move the reconciler makes.
pub struct DeviceGuard<'a> {
    confirm: Box<dyn Confirm + 'a>,
    same_device: DeviceCheck,
}

impl<'a> DeviceGuard<'a> {
    pub fn new(confirm: impl Confirm + 'a) -> Self {
        Self {
            confirm: Box::new(confirm),
            same_device,
        }
    }

    /// Replace the device comparison (for example to treat every move as cross-device).
    pub fn with_device_check(mut self, check: DeviceCheck) -> Self {
        self.same_device = check;
        self
    }

    /// True when the move may proceed: same device, or the operator agreed.
    /// `to` is a destination that does not exist yet, so its parent is compared.
    pub fn confirm_move(&mut self, from: &Path, to: &Path) -> io::Result<bool> {
        let dest_dir = to.parent().unwrap_or(to);
        let same = (self.same_device)(from, dest_dir)?;
        debug!(from = %from.display(), to = %to.display(), same, "device check");
        if same {
            return Ok(true);
        }
        self.confirm.confirm(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn cross(_: &Path, _: &Path) -> io::Result<bool> {
        Ok(false)
    }

    #[test]
    fn prompt_accepts_yes_variants() {
        for answer in ["y\n", "Y\n", " yes \n", "YES\n"] {
            let mut out = Vec::new();
            let mut prompt = TerminalPrompt::new(Cursor::new(answer), &mut out);
            assert!(prompt.confirm(Path::new("/a"), Path::new("/b")).unwrap(), "{answer:?}");
        }
    }

    #[test]
    fn prompt_defaults_to_no() {
        for answer in ["\n", "n\n", "nope\n", ""] {
            let mut out = Vec::new();
            let mut prompt = TerminalPrompt::new(Cursor::new(answer), &mut out);
            assert!(!prompt.confirm(Path::new("/a"), Path::new("/b")).unwrap(), "{answer:?}");
        }
    }

    #[test]
    fn prompt_names_both_paths() {
        let mut out = Vec::new();
        TerminalPrompt::new(Cursor::new("n\n"), &mut out)
            .confirm(Path::new("/home/u/Pictures"), Path::new("/mnt/photos/Pictures"))
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("/home/u/Pictures -> /mnt/photos/Pictures"), "{text}");
        assert!(text.contains("different device"));
    }

    #[test]
    fn same_device_uses_nearest_existing_ancestor() {
        let td = tempdir().unwrap();
        let file = td.path().join("f");
        std::fs::write(&file, "x").unwrap();
        assert!(same_device(&file, &td.path().join("not/yet/there")).unwrap());
    }

    #[test]
    fn same_device_skips_the_prompt() {
        let td = tempdir().unwrap();
        let asked = Cell::new(false);
        let mut guard = DeviceGuard::new(|_: &Path, _: &Path| {
            asked.set(true);
            false
        });
        let src = td.path().join("src");
        std::fs::write(&src, "x").unwrap();
        assert!(guard.confirm_move(&src, &td.path().join("dst")).unwrap());
        assert!(!asked.get());
    }

    #[test]
    fn cross_device_asks_and_obeys() {
        let asked = Cell::new(0);
        let mut guard = DeviceGuard::new(|_: &Path, _: &Path| {
            asked.set(asked.get() + 1);
            false
        })
        .with_device_check(cross);
        assert!(!guard.confirm_move(Path::new("/a/x"), Path::new("/b/x")).unwrap());
        assert_eq!(asked.get(), 1);

        let mut guard = DeviceGuard::new(AssumeYes).with_device_check(cross);
        assert!(guard.confirm_move(Path::new("/a/x"), Path::new("/b/x")).unwrap());
    }
}
