use crate::application::admin_sucursales::management::AdminSucursalRow;
use crate::domain::sucursales::Sucursal;
use crate::presentation::format::pad;

pub const EMPTY_TABLE: &str = "No hay administradores de sucursal registrados";
pub const NO_BRANCHES: &str = "No hay sucursales activas";

const HEADERS: [&str; 6] = ["ID", "Usuario", "Email", "Sucursal", "Estado", "Acciones"];

fn grid_line(cells: &[&str], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| pad(cell, *width))
        .collect();
    format!("{}\n", padded.join("  ").trim_end())
}

fn render_grid<const N: usize>(headers: [&str; N], rows: &[[String; N]]) -> String {
    let mut widths = headers.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = grid_line(&headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let rule: Vec<&str> = rule.iter().map(String::as_str).collect();
    out.push_str(&grid_line(&rule, &widths));
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&grid_line(&cells, &widths));
    }
    out
}

/// Administrators table with one row per record and its action menu.
pub fn render_table(rows: &[AdminSucursalRow]) -> String {
    if rows.is_empty() {
        return format!("{EMPTY_TABLE}\n");
    }

    let cells: Vec<[String; 6]> = rows
        .iter()
        .map(|row| {
            [
                row.id.to_string(),
                row.username.clone(),
                row.email.clone(),
                row.branch.clone(),
                row.status.to_string(),
                row.actions
                    .iter()
                    .map(|a| a.label())
                    .collect::<Vec<_>>()
                    .join(" | "),
            ]
        })
        .collect();

    render_grid(HEADERS, &cells)
}

pub fn render_branches(branches: &[Sucursal]) -> String {
    if branches.is_empty() {
        return format!("{NO_BRANCHES}\n");
    }

    let cells: Vec<[String; 2]> = branches
        .iter()
        .map(|b| [b.id.to_string(), b.display_name()])
        .collect();

    render_grid(["ID", "Sucursal"], &cells)
}
