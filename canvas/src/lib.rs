//! Rendering and coordinate-mapping engine for the wall coverage viewer.
//!
//! The crate draws a bounded physical surface (the wall), its obstacles, and
//! one planned coverage trajectory onto an immediate-mode 2D raster surface.
//! Geometry arrives in meters from the planning backend; everything painted is
//! in pixels. The engine keeps a retained snapshot of the scene so that every
//! change (a new obstacle, a zoom step) can repaint the whole picture from
//! scratch.
//!
//! It compiles both natively (tests, the `wallview` CLI) and to WebAssembly,
//! where [`engine::WallView`] binds it to a browser `<canvas>`.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::ViewController`] and the browser binding |
//! | [`scene`] | Wall / obstacle / trajectory types and the retained [`scene::SceneState`] |
//! | [`mapper`] | Meters ↔ pixels transform with zoom |
//! | [`render`] | The fixed painting pipeline |
//! | [`surface`] | Raster surface trait, styles, and the recording [`surface::DisplayList`] |
//! | [`browser`] | [`surface::Surface`] over a browser `<canvas>` 2D context |
//! | [`config`] | View configuration (surface size, margin, initial scale) |
//! | [`consts`] | Palette and fixed pixel sizes |

pub mod browser;
pub mod config;
pub mod consts;
pub mod engine;
pub mod mapper;
pub mod render;
pub mod scene;
pub mod surface;
