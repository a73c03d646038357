pub(crate) mod child_proxy_handler;
pub(crate) mod dpi_handler;
pub(crate) mod hit_test_handler;
pub(crate) mod message_router;
pub(crate) mod nc_calc_handler;
