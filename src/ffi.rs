//! C API for reading seeds and biome grids from saved worlds.
//!
//! The boundary follows one convention throughout: every fallible function
//! returns a `*mut c_char` that is null on success and an owned,
//! NUL-terminated error message on failure. The caller releases the message
//! with [`free_error_msg`] exactly once; there is no other error channel and
//! no error-code enum.
//!
//! Grid buffers cross the boundary by value inside [`Map`] / [`Map3D`]
//! descriptors. The library allocates the `i32` buffer and the caller owns
//! it until it hands the descriptor back to [`free_map`] / [`free_map3d`]
//! with the pointer and extents unchanged. Cell values may be mutated in
//! place; the buffer must not be resized, replaced, or released through any
//! other path, and the 2D and 3D release functions are not interchangeable.
//!
//! Panics never unwind across the boundary: fallible entry points run under
//! `catch_unwind` and turn a panic into an ordinary error message. In debug
//! builds a process-wide ledger tracks every buffer handed out and the
//! release functions assert the pointer is known with matching extents,
//! catching double frees, foreign pointers and altered extents during
//! development at no release-build cost.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::{mem, ptr, slice};

use crate::error::WorldError;
use crate::formats::world;
use crate::map::{Area3D, BiomeMap, BiomeMap3D};
use crate::render;
use crate::version::McVersion;

// ─── Error Protocol ─────────────────────────────────────────────────────────

/// Build an owned C error string. The caller of the exported function is
/// expected to release it with `free_error_msg`.
fn c_err<T>(e: T) -> *mut c_char
where
    T: Into<Vec<u8>>,
{
    let msg = match CString::new(e) {
        Ok(x) => x,
        Err(nul_error) => {
            // The replacement string contains no NUL bytes
            CString::new(format!("malformed error string: {:?}", nul_error)).unwrap()
        }
    };
    msg.into_raw()
}

/// Release an error message returned by any function in this API.
/// Null is a no-op.
///
/// # Safety
///
/// `err` must have been returned by a function of this library and must not
/// have been modified or released before.
#[no_mangle]
pub unsafe extern "C" fn free_error_msg(err: *mut c_char) {
    if !err.is_null() {
        let c_string = CString::from_raw(err);
        mem::drop(c_string);
    }
}

/// Run an entry point body, converting a panic into an error message
/// instead of unwinding across the boundary.
fn guard(f: impl FnOnce() -> *mut c_char) -> *mut c_char {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            c_err(format!("internal error: {}", msg))
        }
    }
}

/// Decode a required NUL-terminated UTF-8 string argument.
unsafe fn str_arg(arg: *const c_char, what: &str) -> Result<String, *mut c_char> {
    if arg.is_null() {
        return Err(c_err(format!("{} is null", what)));
    }
    match CStr::from_ptr(arg).to_str() {
        Ok(s) => Ok(s.to_string()),
        Err(e) => Err(c_err(format!("{} error: {}", what, e))),
    }
}

// ─── Grid Descriptors ───────────────────────────────────────────────────────

/// A 2D biome grid: origin `(x, z)`, extents `(w, h)` and a row-major cell
/// buffer of exactly `w * h` entries (`a[z * w + x]`).
#[repr(C)]
pub struct Map {
    pub x: i64,
    pub z: i64,
    pub w: u64,
    pub h: u64,
    pub a: *mut i32,
}

/// A 3D biome grid: origin `(x, y, z)`, extents `(sx, sy, sz)` and a cell
/// buffer of exactly `sx * sy * sz` entries (`a[y*sz*sx + z*sx + x]`).
#[repr(C)]
pub struct Map3D {
    pub x: i64,
    pub y: i64,
    pub z: i64,
    pub sx: u64,
    pub sy: u64,
    pub sz: u64,
    pub a: *mut i32,
}

fn into_c_map(map: BiomeMap) -> Map {
    let area = map.area;
    let mut cells = map.into_cells().into_boxed_slice();
    let a = cells.as_mut_ptr();
    track_alloc(a, area.cell_count());
    mem::forget(cells);
    Map {
        x: area.x,
        z: area.z,
        w: area.w,
        h: area.h,
        a,
    }
}

fn into_c_map3d(map: BiomeMap3D) -> Map3D {
    let area = map.area;
    let mut cells = map.into_cells().into_boxed_slice();
    let a = cells.as_mut_ptr();
    track_alloc(a, area.cell_count());
    mem::forget(cells);
    Map3D {
        x: area.x,
        y: area.y,
        z: area.z,
        sx: area.sx,
        sy: area.sy,
        sz: area.sz,
        a,
    }
}

/// Release a 2D grid buffer. A null buffer pointer is a no-op.
///
/// # Safety
///
/// `map.a`, `map.w` and `map.h` must be unchanged since this `Map` was
/// produced; only the cell values may have been modified. Each produced
/// grid must be released at most once, and only through this function.
#[no_mangle]
pub unsafe extern "C" fn free_map(map: Map) {
    if !map.a.is_null() {
        track_release(map.a, map.w * map.h);
        let len = (map.w * map.h) as usize;
        let boxed_slice = Box::from_raw(slice::from_raw_parts_mut(map.a, len));
        mem::drop(boxed_slice);
    }
}

/// Release a 3D grid buffer. A null buffer pointer is a no-op.
///
/// # Safety
///
/// `map.a`, `map.sx`, `map.sy` and `map.sz` must be unchanged since this
/// `Map3D` was produced; only the cell values may have been modified. Each
/// produced grid must be released at most once, and only through this
/// function.
#[no_mangle]
pub unsafe extern "C" fn free_map3d(map: Map3D) {
    if !map.a.is_null() {
        track_release(map.a, map.sx * map.sy * map.sz);
        let len = (map.sx * map.sy * map.sz) as usize;
        let boxed_slice = Box::from_raw(slice::from_raw_parts_mut(map.a, len));
        mem::drop(boxed_slice);
    }
}

// ─── Entry Points ───────────────────────────────────────────────────────────

/// Read the world seed from the world at `world_path` (zip or directory)
/// into `seed`. `mc_version` is an optional hint ("1.15", "1.18", ...);
/// pass null or an unrecognized string to try every known seed location.
#[no_mangle]
pub extern "C" fn read_seed_from_mc_world(
    world_path: *const c_char,
    mc_version: *const c_char,
    seed: *mut i64,
) -> *mut c_char {
    guard(|| {
        if seed.is_null() {
            return c_err("seed output pointer is null");
        }
        let path = match unsafe { str_arg(world_path, "world_path") } {
            Ok(s) => PathBuf::from(s),
            Err(e) => return e,
        };
        // The version is a hint here, so parse failures are not errors
        let version: Option<McVersion> = if mc_version.is_null() {
            None
        } else {
            match unsafe { str_arg(mc_version, "mc_version") } {
                Ok(s) => s.parse().ok(),
                Err(e) => return e,
            }
        };

        let world_seed = match world::read_seed(&path, version) {
            Ok(x) => x,
            Err(e) => return c_err(format!("error reading seed from world: {}", e)),
        };

        unsafe {
            *seed = world_seed;
        }
        ptr::null_mut()
    })
}

/// Read a dense 2D biome grid from the world at `world_path` into
/// `biome_map`. Fails for 1.18+ worlds (their biomes are 3D; use
/// `read_biome_map3d_from_mc_world`). On success the caller owns the grid
/// and must release it with `free_map`.
#[no_mangle]
pub extern "C" fn read_biome_map_from_mc_world(
    world_path: *const c_char,
    mc_version: *const c_char,
    biome_map: *mut Map,
) -> *mut c_char {
    guard(|| {
        if biome_map.is_null() {
            return c_err("biome_map output pointer is null");
        }
        let path = match unsafe { str_arg(world_path, "world_path") } {
            Ok(s) => PathBuf::from(s),
            Err(e) => return e,
        };
        let version: McVersion = match unsafe { str_arg(mc_version, "mc_version") } {
            Ok(s) => match s.parse() {
                Ok(v) => v,
                Err(e) => return c_err(format!("mc_version parse error: {}", e)),
            },
            Err(e) => return e,
        };

        let map = match world::read_biome_map(&path, version) {
            Ok(m) => m,
            Err(e) => return c_err(format!("error reading biome map: {}", e)),
        };

        unsafe {
            *biome_map = into_c_map(map);
        }
        ptr::null_mut()
    })
}

/// Read a dense 3D biome grid from the world at `world_path` into
/// `biome_map`. Pre-1.18 worlds produce a single-layer grid (`sy == 1`).
/// On success the caller owns the grid and must release it with
/// `free_map3d`.
#[no_mangle]
pub extern "C" fn read_biome_map3d_from_mc_world(
    world_path: *const c_char,
    mc_version: *const c_char,
    biome_map: *mut Map3D,
) -> *mut c_char {
    guard(|| {
        if biome_map.is_null() {
            return c_err("biome_map output pointer is null");
        }
        let path = match unsafe { str_arg(world_path, "world_path") } {
            Ok(s) => PathBuf::from(s),
            Err(e) => return e,
        };
        let version: McVersion = match unsafe { str_arg(mc_version, "mc_version") } {
            Ok(s) => match s.parse() {
                Ok(v) => v,
                Err(e) => return c_err(format!("mc_version parse error: {}", e)),
            },
            Err(e) => return e,
        };

        let map = match world::read_biome_map_3d(&path, version) {
            Ok(m) => m,
            Err(e) => return c_err(format!("error reading biome map: {}", e)),
        };

        unsafe {
            *biome_map = into_c_map3d(map);
        }
        ptr::null_mut()
    })
}

/// Render a 3D grid to a PNG at `output_file_path`, one pixel per cell,
/// with the `sy` layers stacked vertically (width `sx`, height `sy * sz`).
/// The grid is only read; ownership stays with the caller.
#[no_mangle]
pub extern "C" fn draw_map3d_image_to_file(
    biome_map: *const Map3D,
    output_file_path: *const c_char,
) -> *mut c_char {
    guard(|| {
        let map = match unsafe { biome_map.as_ref() } {
            Some(m) => m,
            None => return c_err("biome_map is null"),
        };
        if map.a.is_null() {
            return c_err("biome_map buffer is null");
        }
        let path = match unsafe { str_arg(output_file_path, "output_file_path") } {
            Ok(s) => PathBuf::from(s),
            Err(e) => return e,
        };

        let area = Area3D {
            x: map.x,
            y: map.y,
            z: map.z,
            sx: map.sx,
            sy: map.sy,
            sz: map.sz,
        };
        let len = (map.sx * map.sy * map.sz) as usize;
        let cells = unsafe { slice::from_raw_parts(map.a, len) };
        let grid = match BiomeMap3D::from_parts(area, cells.to_vec()) {
            Ok(g) => g,
            Err(e) => return c_err(format!("invalid biome map: {}", e)),
        };

        match render::save_map3d_png(&grid, &path) {
            Ok(()) => ptr::null_mut(),
            Err(e @ WorldError::ImageTooLarge(..)) => c_err(format!("{}", e)),
            Err(e) => c_err(format!("error writing image: {}", e)),
        }
    })
}

// ─── Provenance Ledger (debug builds) ───────────────────────────────────────

#[cfg(debug_assertions)]
mod ledger {
    use std::collections::HashMap;
    use std::sync::{Mutex, OnceLock};

    fn table() -> &'static Mutex<HashMap<usize, u64>> {
        static TABLE: OnceLock<Mutex<HashMap<usize, u64>>> = OnceLock::new();
        TABLE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    pub fn register(addr: usize, len: u64) {
        table().lock().unwrap().insert(addr, len);
    }

    pub fn release(addr: usize, len: u64) {
        // Take the entry out before any panic so the table lock is not
        // poisoned when the assertion fires.
        let removed = table().lock().unwrap().remove(&addr);
        match removed {
            Some(expected) => assert_eq!(
                expected, len,
                "grid buffer released with altered extents: handed out with {} cells, released with {}",
                expected, len
            ),
            None => panic!(
                "released a grid buffer this library did not hand out (double free or foreign pointer?)"
            ),
        }
    }

    pub fn live_count() -> usize {
        table().lock().unwrap().len()
    }
}

fn track_alloc(ptr: *const i32, len: u64) {
    #[cfg(debug_assertions)]
    ledger::register(ptr as usize, len);
    #[cfg(not(debug_assertions))]
    let _ = (ptr, len);
}

fn track_release(ptr: *const i32, len: u64) {
    #[cfg(debug_assertions)]
    ledger::release(ptr as usize, len);
    #[cfg(not(debug_assertions))]
    let _ = (ptr, len);
}

/// Number of grid buffers currently handed out and not yet released.
/// Only meaningful in debug builds, where the ledger is maintained.
#[cfg(debug_assertions)]
pub fn live_buffer_count() -> usize {
    ledger::live_count()
}

// ─── Tests ──────────────────────────────────────────────────────────────────
