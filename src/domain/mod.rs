pub mod admin_sucursales;
pub mod session;
pub mod sucursales;
