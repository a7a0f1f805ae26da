//! USB transport for printers that expose a bulk OUT endpoint.
//!
//! Bytes are collected in memory and written as one bulk transfer when the
//! driver flushes, which it does after every command and raster chunk.

use log::{debug, info, warn};
use rusb::{Context, Device, DeviceDescriptor, DeviceHandle, Direction, TransferType, UsbContext};
use std::time::Duration;

use crate::{
    error::{Error, Result},
    sink::ByteSink,
};

#[derive(Debug, Clone, Copy)]
struct Endpoint {
    config: u8,
    iface: u8,
    setting: u8,
    address: u8,
}

/// Bulk OUT transport.
///
/// Bytes the device accepted are never sent again: after a short write only
/// the unsent tail stays buffered. Dropping the sink makes one last attempt
/// to send that tail and discards whatever is still refused.
pub struct UsbSink {
    handle: DeviceHandle<Context>,
    endpoint_out: Endpoint,
    buffer: Vec<u8>,
    timeout: Duration,
}

impl UsbSink {
    /// Open the first device matching `vid`/`pid`, and `serial` when given.
    pub fn open(vid: u16, pid: u16, serial: Option<&str>) -> Result<Self> {
        let mut context = Context::new()?;
        let (mut device, device_desc, mut handle) =
            match Self::open_device(&mut context, vid, pid, serial) {
                Ok(found) => found,
                Err(err) => {
                    debug!("{:?}", err);
                    return Err(Error::DeviceOffline);
                }
            };

        let endpoint_out = Self::find_endpoint(&mut device, &device_desc, Direction::Out)
            .ok_or(Error::MissingEndpoint)?;

        handle.set_auto_detach_kernel_driver(true).ok();
        let has_kernel_driver =
            matches!(handle.kernel_driver_active(endpoint_out.iface), Ok(true));
        info!(" Kernel driver support is {}", has_kernel_driver);
        handle.set_active_configuration(endpoint_out.config)?;
        handle.claim_interface(endpoint_out.iface)?;
        handle.set_alternate_setting(endpoint_out.iface, endpoint_out.setting)?;

        Ok(UsbSink {
            handle,
            endpoint_out,
            buffer: Vec::new(),
            timeout: Duration::from_secs(10),
        })
    }

    /// Time allowed for one bulk transfer.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn open_device(
        context: &mut Context,
        vid: u16,
        pid: u16,
        serial: Option<&str>,
    ) -> Result<(Device<Context>, DeviceDescriptor, DeviceHandle<Context>)> {
        let devices = context.devices()?;

        if devices.is_empty() {
            debug!("Failed to read device list");
            return Err(Error::DeviceListNotReadable);
        }
        for device in devices.iter() {
            let device_desc = match device.device_descriptor() {
                Ok(d) => d,
                Err(err) => {
                    debug!("{:?}", err);
                    continue;
                }
            };

            if device_desc.vendor_id() != vid || device_desc.product_id() != pid {
                continue;
            }
            let handle = match device.open() {
                Ok(handle) => handle,
                Err(err) => {
                    debug!("Failed to open device: {:?}", err);
                    continue;
                }
            };
            let wanted = match serial {
                Some(wanted) => wanted,
                None => return Ok((device, device_desc, handle)),
            };

            let timeout = Duration::from_secs(1);
            let languages = handle.read_languages(timeout)?;
            let language = match languages.first() {
                Some(language) => *language,
                None => continue,
            };
            match handle.read_serial_number_string(language, &device_desc, timeout) {
                Ok(s) if s == wanted => return Ok((device, device_desc, handle)),
                Ok(_) => continue,
                Err(err) => {
                    debug!("Failed to read serial number string: {:?}", err);
                    continue;
                }
            }
        }
        debug!("No device match {:04x}:{:04x} serial {:?}", vid, pid, serial);
        Err(Error::DeviceOffline)
    }

    fn find_endpoint(
        device: &mut Device<Context>,
        device_desc: &DeviceDescriptor,
        direction: Direction,
    ) -> Option<Endpoint> {
        for n in 0..device_desc.num_configurations() {
            let config_desc = match device.config_descriptor(n) {
                Ok(c) => c,
                Err(_) => continue,
            };
            for interface in config_desc.interfaces() {
                for interface_desc in interface.descriptors() {
                    for endpoint_desc in interface_desc.endpoint_descriptors() {
                        if endpoint_desc.direction() == direction
                            && endpoint_desc.transfer_type() == TransferType::Bulk
                        {
                            return Some(Endpoint {
                                config: config_desc.number(),
                                iface: interface_desc.interface_number(),
                                setting: interface_desc.setting_number(),
                                address: endpoint_desc.address(),
                            });
                        }
                    }
                }
            }
        }
        None
    }

    fn write(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let n = self
            .handle
            .write_bulk(self.endpoint_out.address, &self.buffer, self.timeout)?;
        settle_write(&mut self.buffer, n)
    }
}

/// Drop the bytes the device accepted from the front of `buffer`.
///
/// On a short write the unsent tail stays buffered and `ShortWrite` is
/// returned, so a later flush continues where the transfer stopped.
fn settle_write(buffer: &mut Vec<u8>, written: usize) -> Result<()> {
    let expected = buffer.len();
    if written >= expected {
        buffer.clear();
        return Ok(());
    }
    debug!(
        "write error: bytes wrote {} != bytes supplied {}, possibly timeout ?",
        written, expected
    );
    buffer.drain(..written);
    Err(Error::ShortWrite { written, expected })
}

impl ByteSink for UsbSink {
    fn emit(&mut self, byte: u8) -> Result<()> {
        self.buffer.push(byte);
        Ok(())
    }

    fn delay(&mut self, duration: Duration) {
        if let Err(err) = self.write() {
            warn!("write before delay failed: {}", err);
        }
        std::thread::sleep(duration);
    }

    fn emit_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.write()
    }
}

impl Drop for UsbSink {
    fn drop(&mut self) {
        if let Err(err) = self.write() {
            warn!("dropping {} unsent bytes: {}", self.buffer.len(), err);
        }
        self.handle.release_interface(self.endpoint_out.iface).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settle_full_write_clears() {
        let mut buffer = vec![18, 42, 1, 1, 0xFF];
        settle_write(&mut buffer, 5).unwrap();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_settle_short_write_keeps_unsent_tail() {
        let mut buffer: Vec<u8> = (0..244).map(|i| i as u8).collect();
        match settle_write(&mut buffer, 100) {
            Err(Error::ShortWrite { written, expected }) => {
                assert_eq!(written, 100);
                assert_eq!(expected, 244);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(buffer.len(), 144);
        assert_eq!(buffer[0], 100);

        // the retry only sends what is left
        settle_write(&mut buffer, 144).unwrap();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_settle_nothing_accepted() {
        let mut buffer = vec![10, 10];
        assert!(settle_write(&mut buffer, 0).is_err());
        assert_eq!(buffer, vec![10, 10]);
    }
}
