//! Virtual-device backend: system-wide key events through uinput.
//!
//! # How uinput works (for beginners)
//!
//! `/dev/uinput` lets a process create a *virtual input device* that
//! the kernel treats exactly like a plugged-in keyboard. Creation is a
//! strict protocol:
//!
//! 1. Declare, via `UI_SET_EVBIT`/`UI_SET_KEYBIT` ioctls, every event
//!    type and key code the device will ever emit — its capability
//!    set. The kernel silently drops events for undeclared keys, so
//!    registration must be complete before any event.
//! 2. Describe the device (`UI_DEV_SETUP`: name, bus, vendor/product)
//!    and create it (`UI_DEV_CREATE`).
//! 3. Wait briefly: display servers and libinput need a moment to
//!    enumerate the new device before they will accept events from it.
//! 4. Emit events by writing `struct input_event` records to the fd.
//!    A zeroed timestamp is filled in by the kernel.
//! 5. Destroy the device with `UI_DEV_DESTROY` — exactly once.
//!
//! The ioctl request values and struct layout below are carried over
//! from `<linux/uinput.h>` and `<linux/input.h>`.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::mem;
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use std::thread;
use std::time::Duration;

use keyject_core::{KeyCode, KeyEvent};
use tracing::{debug, info};

use crate::application::inject_text::{BackendError, KeyEventSink};

const UINPUT_PATH: &str = "/dev/uinput";

// Event types and codes from <linux/input-event-codes.h>.
const EV_SYN: u16 = 0x00;
const EV_KEY: u16 = 0x01;
const SYN_REPORT: u16 = 0;
const BUS_USB: u16 = 0x03;

// ioctl requests from <linux/uinput.h> ('U' = 0x55).
const UI_SET_EVBIT: libc::c_ulong = 0x4004_5564; // _IOW('U', 100, int)
const UI_SET_KEYBIT: libc::c_ulong = 0x4004_5565; // _IOW('U', 101, int)
const UI_DEV_SETUP: libc::c_ulong = 0x405C_5503; // _IOW('U', 3, struct uinput_setup)
const UI_DEV_CREATE: libc::c_ulong = 0x5501; // _IO('U', 1)
const UI_DEV_DESTROY: libc::c_ulong = 0x5502; // _IO('U', 2)

const UINPUT_MAX_NAME_SIZE: usize = 80;
const DEVICE_NAME: &[u8] = b"keyject virtual keyboard";
const VENDOR_ID: u16 = 0x1d6b; // Linux Foundation
const PRODUCT_ID: u16 = 0x0104;

/// Pause after device creation so downstream consumers (display server,
/// libinput) finish enumerating it before the first event arrives.
const SETTLE_DELAY: Duration = Duration::from_secs(1);

/// `struct input_id` from `<linux/input.h>`.
#[repr(C)]
struct InputId {
    bustype: u16,
    vendor: u16,
    product: u16,
    version: u16,
}

/// `struct uinput_setup` from `<linux/uinput.h>`.
#[repr(C)]
struct UinputSetup {
    id: InputId,
    name: [u8; UINPUT_MAX_NAME_SIZE],
    ff_effects_max: u32,
}

/// One on-the-wire `struct input_event` with a zeroed timestamp,
/// serialized in native byte order.
fn encode_event(event_type: u16, code: u16, value: i32) -> [u8; EVENT_SIZE] {
    let mut buf = [0u8; EVENT_SIZE];
    let t = mem::size_of::<libc::timeval>();
    buf[t..t + 2].copy_from_slice(&event_type.to_ne_bytes());
    buf[t + 2..t + 4].copy_from_slice(&code.to_ne_bytes());
    buf[t + 4..t + 8].copy_from_slice(&value.to_ne_bytes());
    buf
}

const EVENT_SIZE: usize = mem::size_of::<libc::timeval>() + 8;

/// Key-event backend emitting through a uinput virtual keyboard.
pub struct UinputBackend {
    device: File,
    created: bool,
}

impl UinputBackend {
    /// Opens `/dev/uinput`, registers the complete capability set
    /// ([`KeyCode::ALL`]), and creates the virtual device. No event may
    /// be emitted before this returns.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Acquire`] if the uinput device file is
    /// missing or inaccessible (typically: the `uinput` module is not
    /// loaded, or the process lacks permission), or if any registration
    /// ioctl fails.
    pub fn create() -> Result<Self, BackendError> {
        if !Path::new(UINPUT_PATH).exists() {
            return Err(BackendError::Acquire(format!(
                "{UINPUT_PATH} not found; load the uinput module (modprobe uinput)"
            )));
        }

        let device = OpenOptions::new()
            .write(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(UINPUT_PATH)
            .map_err(|e| BackendError::Acquire(format!("cannot open {UINPUT_PATH}: {e}")))?;
        let fd = device.as_raw_fd();

        // Declare the capability set before creating the device.
        ioctl_with_int(fd, UI_SET_EVBIT, i32::from(EV_KEY))?;
        for key in KeyCode::ALL {
            ioctl_with_int(fd, UI_SET_KEYBIT, i32::from(key.code()))?;
        }

        let setup = UinputSetup {
            id: InputId {
                bustype: BUS_USB,
                vendor: VENDOR_ID,
                product: PRODUCT_ID,
                version: 1,
            },
            name: device_name(),
            ff_effects_max: 0,
        };
        // SAFETY: UinputSetup is #[repr(C)] and layout-compatible with
        // struct uinput_setup; the kernel only reads through the pointer.
        let rc = unsafe { libc::ioctl(fd, UI_DEV_SETUP, &setup as *const UinputSetup) };
        if rc < 0 {
            return Err(BackendError::Acquire(format!(
                "UI_DEV_SETUP failed: {}",
                io::Error::last_os_error()
            )));
        }

        // SAFETY: UI_DEV_CREATE takes no argument.
        let rc = unsafe { libc::ioctl(fd, UI_DEV_CREATE) };
        if rc < 0 {
            return Err(BackendError::Acquire(format!(
                "UI_DEV_CREATE failed: {}",
                io::Error::last_os_error()
            )));
        }

        info!("virtual keyboard created, waiting for consumers to settle");
        thread::sleep(SETTLE_DELAY);

        Ok(Self {
            device,
            created: true,
        })
    }

    fn write_event(&mut self, event_type: u16, code: u16, value: i32) -> Result<(), BackendError> {
        self.device
            .write_all(&encode_event(event_type, code, value))
            .map_err(BackendError::Write)
    }

    /// Destroys the virtual device. Idempotent: only the first call
    /// issues the ioctl.
    fn destroy(&mut self) -> Result<(), BackendError> {
        if !self.created {
            return Ok(());
        }
        self.created = false;

        // SAFETY: UI_DEV_DESTROY takes no argument.
        let rc = unsafe { libc::ioctl(self.device.as_raw_fd(), UI_DEV_DESTROY) };
        if rc < 0 {
            return Err(BackendError::Restore(format!(
                "UI_DEV_DESTROY failed: {}",
                io::Error::last_os_error()
            )));
        }
        debug!("virtual keyboard destroyed");
        Ok(())
    }
}

impl KeyEventSink for UinputBackend {
    fn emit_event(&mut self, event: &KeyEvent) -> Result<(), BackendError> {
        if !self.created {
            return Err(BackendError::Closed);
        }

        match *event {
            KeyEvent::ModifierPress(key) | KeyEvent::KeyPress(key) => {
                self.write_event(EV_KEY, key.code(), 1)
            }
            KeyEvent::KeyRelease(key) | KeyEvent::ModifierRelease(key) => {
                self.write_event(EV_KEY, key.code(), 0)
            }
            KeyEvent::Sync => self.write_event(EV_SYN, SYN_REPORT, 0),
        }
    }

    fn close(&mut self) -> Result<(), BackendError> {
        self.destroy()
    }
}

impl Drop for UinputBackend {
    fn drop(&mut self) {
        // Backstop only: close() has normally already destroyed.
        let _ = self.destroy();
    }
}

fn ioctl_with_int(fd: i32, request: libc::c_ulong, value: i32) -> Result<(), BackendError> {
    // SAFETY: these requests take a plain int argument by value.
    let rc = unsafe { libc::ioctl(fd, request, value) };
    if rc < 0 {
        return Err(BackendError::Acquire(format!(
            "uinput ioctl {request:#x}({value}) failed: {}",
            io::Error::last_os_error()
        )));
    }
    Ok(())
}

/// The device name, NUL-padded to `UINPUT_MAX_NAME_SIZE`.
fn device_name() -> [u8; UINPUT_MAX_NAME_SIZE] {
    let mut name = [0u8; UINPUT_MAX_NAME_SIZE];
    name[..DEVICE_NAME.len()].copy_from_slice(DEVICE_NAME);
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_name_fits_and_is_nul_terminated() {
        // Arrange / Act
        let name = device_name();

        // Assert – name fits with room for the terminating NUL
        assert!(DEVICE_NAME.len() < UINPUT_MAX_NAME_SIZE);
        assert_eq!(&name[..DEVICE_NAME.len()], DEVICE_NAME);
        assert_eq!(name[DEVICE_NAME.len()], 0);
    }

    #[test]
    fn test_encoded_event_zeroes_the_timestamp() {
        let buf = encode_event(EV_KEY, 30, 1);
        let t = mem::size_of::<libc::timeval>();
        assert!(buf[..t].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_encoded_event_lays_out_type_code_value() {
        // Arrange / Act
        let buf = encode_event(EV_KEY, 30, 1);
        let t = mem::size_of::<libc::timeval>();

        // Assert – native-endian type, code, value after the timestamp
        assert_eq!(buf[t..t + 2], 1u16.to_ne_bytes());
        assert_eq!(buf[t + 2..t + 4], 30u16.to_ne_bytes());
        assert_eq!(buf[t + 4..t + 8], 1i32.to_ne_bytes());
    }

    #[test]
    fn test_sync_event_is_all_zero_payload() {
        let buf = encode_event(EV_SYN, SYN_REPORT, 0);
        assert!(buf.iter().all(|&b| b == 0));
    }
}
