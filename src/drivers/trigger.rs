//! External trigger input (push button) on a GPIO edge interrupt.
//!
//! The ISR does one thing: raise the rate-change flag.  Debouncing is left
//! to the flag itself: repeated edges before the loop consumes it collapse
//! into one request.

use crate::error::Error;
use crate::events::EventFlags;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
unsafe extern "C" fn trigger_gpio_isr(arg: *mut core::ffi::c_void) {
    // SAFETY: `arg` is the `&'static EventFlags` registered in `install()`.
    let flags = unsafe { &*(arg as *const EventFlags) };
    flags.trigger_notifier().on_edge();
}

/// Configure the trigger pin (input, pull-up, falling edge) and register
/// its ISR.  Call once from the bring-up path, before the loop starts.
#[cfg(target_os = "espidf")]
pub fn install(flags: &'static EventFlags) -> Result<(), Error> {
    // SAFETY: called once from the main task before the event loop.  The
    // ISR argument points at a 'static and is only read.
    unsafe {
        let io_conf = gpio_config_t {
            pin_bit_mask: 1u64 << pins::TRIGGER_GPIO,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_NEGEDGE,
            ..Default::default()
        };
        let ret = gpio_config(&io_conf);
        if ret != ESP_OK {
            log::error!("trigger: gpio_config failed (rc={})", ret);
            return Err(Error::Init("trigger gpio config"));
        }

        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
            log::error!("trigger: ISR service install failed (rc={})", ret);
            return Err(Error::Init("gpio isr service"));
        }

        let arg = flags as *const EventFlags as *mut core::ffi::c_void;
        let ret = gpio_isr_handler_add(pins::TRIGGER_GPIO, Some(trigger_gpio_isr), arg);
        if ret != ESP_OK {
            log::error!("trigger: handler add failed (rc={})", ret);
            return Err(Error::Init("trigger isr handler"));
        }
        gpio_intr_enable(pins::TRIGGER_GPIO);
    }
    log::info!("trigger: GPIO{} falling edge armed", crate::pins::TRIGGER_GPIO);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn install(flags: &EventFlags) -> Result<(), Error> {
    let _ = flags;
    log::info!("trigger(sim): ISR not installed (use sim_press)");
    Ok(())
}

/// Simulate a button press on host builds.
#[cfg(not(target_os = "espidf"))]
pub fn sim_press(flags: &EventFlags) {
    flags.trigger_notifier().on_edge();
}
