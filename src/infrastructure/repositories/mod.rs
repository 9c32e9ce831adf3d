pub mod admin_sucursales;
pub mod mock;
pub mod sucursales;
