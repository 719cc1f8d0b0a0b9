//! SoftDevice bring-up, GAP configuration, and the raw requests behind
//! [`BleStack`].

use core::mem;
use core::ptr;

use defmt::{info, warn};
use nrf_softdevice::ble::get_address;
use nrf_softdevice::{raw, Softdevice};

use crate::ble::advertising::{device_name, DEVICE_NAME_LEN};
use crate::ble::conn_params::ConnParams;
use crate::config::BLE_ATT_MTU;
use crate::error::BleError;
use crate::link::ConnectionHandle;
use crate::ports::{BleStack, DisconnectReason};

/// Map a SoftDevice return code, logging failures under `what`.
fn check(ret: u32, what: &str) -> Result<(), u32> {
    if ret == raw::NRF_SUCCESS {
        Ok(())
    } else {
        warn!("{} failed: 0x{:x}", what, ret);
        Err(ret)
    }
}

/// SoftDevice configuration for a single peripheral link.
pub fn softdevice_config() -> nrf_softdevice::Config {
    nrf_softdevice::Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_XTAL as u8,
            rc_ctiv: 0,
            rc_temp_ctiv: 0,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_20_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 6,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t {
            att_mtu: BLE_ATT_MTU,
        }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
            central_role_count: 0,
            central_sec_count: 0,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        // Name is set at runtime from the address; the stack owns the buffer.
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: ptr::null_mut(),
            current_len: 0,
            max_len: DEVICE_NAME_LEN as u16,
            write_perm: unsafe { mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}

/// Derive the device name from the address and publish it together with
/// the preferred connection parameters.
///
/// Returns the raw address bytes for the advertising payload.
pub fn configure_gap(sd: &Softdevice) -> Result<[u8; 6], BleError> {
    let addr = get_address(sd).bytes();
    let name = device_name(&addr);

    // Open security: no pairing required to read the name.
    let sec_mode = raw::ble_gap_conn_sec_mode_t {
        _bitfield_1: raw::ble_gap_conn_sec_mode_t::new_bitfield_1(1, 1),
    };
    let ret = unsafe {
        raw::sd_ble_gap_device_name_set(&sec_mode, name.as_ptr(), name.len() as u16)
    };
    check(ret, "sd_ble_gap_device_name_set").map_err(|_| BleError::GapConfig)?;

    let ppcp = to_raw(&ConnParams::PREFERRED);
    let ret = unsafe { raw::sd_ble_gap_ppcp_set(&ppcp) };
    check(ret, "sd_ble_gap_ppcp_set").map_err(|_| BleError::GapConfig)?;

    info!("GAP: name {}", name.as_str());
    Ok(addr)
}

pub fn to_raw(params: &ConnParams) -> raw::ble_gap_conn_params_t {
    raw::ble_gap_conn_params_t {
        min_conn_interval: params.min_interval,
        max_conn_interval: params.max_interval,
        slave_latency: params.slave_latency,
        conn_sup_timeout: params.sup_timeout,
    }
}

pub fn from_raw(params: &raw::ble_gap_conn_params_t) -> ConnParams {
    ConnParams {
        min_interval: params.min_conn_interval,
        max_interval: params.max_conn_interval,
        slave_latency: params.slave_latency,
        sup_timeout: params.conn_sup_timeout,
    }
}

/// Direct SoftDevice GAP calls.
#[derive(Clone, Copy, Default)]
pub struct SoftdeviceStack;

impl BleStack for SoftdeviceStack {
    fn disconnect(
        &mut self,
        conn: ConnectionHandle,
        reason: DisconnectReason,
    ) -> Result<(), BleError> {
        let ret = unsafe { raw::sd_ble_gap_disconnect(conn.raw(), reason.hci_code()) };
        check(ret, "sd_ble_gap_disconnect").map_err(|_| BleError::DisconnectFailed)
    }

    fn request_auto_phy(&mut self, conn: ConnectionHandle) -> Result<(), BleError> {
        let phys = raw::ble_gap_phys_t {
            tx_phys: raw::BLE_GAP_PHY_AUTO as u8,
            rx_phys: raw::BLE_GAP_PHY_AUTO as u8,
        };
        let ret = unsafe { raw::sd_ble_gap_phy_update(conn.raw(), &phys) };
        check(ret, "sd_ble_gap_phy_update").map_err(|_| BleError::PhyUpdateFailed)
    }
}
