//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter    | Implements          | Connects to                    |
//! |------------|---------------------|--------------------------------|
//! | `hardware` | SensorBusPort       | I2C controller (embedded-hal)  |
//! |            | TimerPort           | esp_timer / simulation         |
//! |            | TransferPort        | UART TX / simulation           |
//! |            | TelemetryPort       | `scope` probe byte             |
//! |            | IndicatorPort       | GPIO output (embedded-hal)     |
//! | `log_sink` | EventSink           | Serial log output              |
//! | `nvs`      | ConfigPort          | NVS / in-memory store          |
//! | `scope`    | TelemetryPort       | Exported probe symbol          |

pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod scope;
