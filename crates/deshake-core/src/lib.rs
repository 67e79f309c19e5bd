pub mod consts;
pub mod correct;
pub mod error;
pub mod frame;
pub mod io;
pub mod linestart;
pub mod params;
pub mod pipeline;
pub mod shift;
