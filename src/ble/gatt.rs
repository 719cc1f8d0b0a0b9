//! GATT server: one vendor service with a write-only press characteristic.

/// Press request service (LED Button Service base UUID).
#[nrf_softdevice::gatt_service(uuid = "00001523-1212-efde-1523-785feabcd123")]
pub struct PressService {
    /// One byte: 1 = short press, 2 = long press.
    #[characteristic(uuid = "00001525-1212-efde-1523-785feabcd123", write)]
    pub press: u8,
}

#[nrf_softdevice::gatt_server]
pub struct Server {
    pub press: PressService,
}
