use std::fmt::Write;

use super::state::{BannerKind, Model};
use crate::validation::Field;

/// Renders the whole screen: banner, form, list and pagination bar.
pub fn render(model: &Model) -> String {
    let mut out = String::new();
    write_screen(&mut out, model).expect("writing to a String cannot fail");
    out
}

fn write_screen(out: &mut String, model: &Model) -> std::fmt::Result {
    if let Some(banner) = &model.banner {
        let tag = match banner.kind {
            BannerKind::Success => "ok",
            BannerKind::Error => "error",
        };
        writeln!(out, "[{tag}] {}", banner.message)?;
    }

    writeln!(out, "Contact Book")?;
    writeln!(out)?;
    writeln!(out, "Add Contact")?;
    for field in Field::ALL {
        write!(out, "  {:<6} {}", format!("{field}:"), model.form.get(field))?;
        if let Some(err) = model.errors.get(field) {
            write!(out, "  ! {err}")?;
        }
        writeln!(out)?;
    }
    writeln!(out)?;

    if model.contacts.is_empty() {
        writeln!(out, "  (no contacts)")?;
    }
    for (i, c) in model.contacts.iter().enumerate() {
        writeln!(out, "{:>3}. {}", i + 1, c.name)?;
        writeln!(out, "     phone: {}", c.phone)?;
        writeln!(out, "     email: {}", c.email)?;
    }
    writeln!(out)?;

    let prev = if model.can_go_prev() { "[prev]" } else { "[----]" };
    let next = if model.can_go_next() { "[next]" } else { "[----]" };
    writeln!(
        out,
        "{prev} Page {} of {} {next}",
        model.current_page, model.total_pages
    )?;

    if let Some(id) = model.pending_delete {
        let name = model
            .contacts
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
            .unwrap_or("this contact");
        writeln!(out, "Are you sure you want to delete {name}? (yes/no)")?;
    }
    Ok(())
}
