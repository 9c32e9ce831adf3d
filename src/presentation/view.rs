use crate::domain::admin_sucursales::AdminSucursal;
use crate::presentation::format::{long_date, or_not_available, pad};

pub const VIEW_TITLE: &str = "Detalle del Administrador de Sucursal";
pub const NO_RECORD: &str = "No hay información disponible";

/// Read-only detail of one administrator, grouped the way the detail dialog
/// shows it: account, branch, audit dates.
pub fn render_detail(admin: Option<&AdminSucursal>) -> String {
    let Some(admin) = admin else {
        return NO_RECORD.to_string();
    };

    let sections: [(&str, Vec<(&str, String)>); 3] = [
        (
            "Cuenta",
            vec![
                ("ID", admin.id.to_string()),
                ("Usuario", admin.username.clone()),
                ("Email", admin.email.clone()),
                ("Estado", admin.status_label().to_string()),
            ],
        ),
        (
            "Sucursal",
            vec![
                ("Nombre", or_not_available(admin.branch_name.as_deref()).to_string()),
                (
                    "Descripción",
                    or_not_available(admin.branch_description.as_deref()).to_string(),
                ),
                (
                    "Dirección",
                    or_not_available(admin.branch_address.as_deref()).to_string(),
                ),
            ],
        ),
        (
            "Registro",
            vec![
                ("Creado", long_date(admin.created_at)),
                ("Actualizado", long_date(admin.updated_at)),
            ],
        ),
    ];

    let width = sections
        .iter()
        .flat_map(|(_, fields)| fields.iter().map(|(label, _)| label.chars().count()))
        .max()
        .unwrap_or(0);

    let mut out = String::from(VIEW_TITLE);
    out.push('\n');
    for (heading, fields) in &sections {
        out.push('\n');
        out.push_str(heading);
        out.push('\n');
        for (label, value) in fields {
            out.push_str("  ");
            out.push_str(&pad(label, width));
            out.push_str("  ");
            out.push_str(value);
            out.push('\n');
        }
    }
    out
}
