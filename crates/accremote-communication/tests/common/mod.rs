#![allow(dead_code)]

use accremote_communication::{ConnectionParams, SessionManager, Transport, TransportFactory};
use accremote_core::ConnectionError;
use accremote_settings::Config;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

pub const MOCK_PORT: &str = "/dev/ttyMOCK";

/// Everything the mock device saw, plus knobs to make it misbehave
#[derive(Default)]
pub struct Device {
    pub open: bool,
    pub written: Vec<String>,
    pub inbound: VecDeque<io::Result<Vec<u8>>>,
    pub opened_with: Vec<ConnectionParams>,
    pub refuse_open: bool,
    pub fail_writes: bool,
    pub fail_teardown: bool,
    pub input_flushes: usize,
    pub output_flushes: usize,
    pub closes: usize,
}

pub type SharedDevice = Arc<Mutex<Device>>;

pub fn push_inbound(device: &SharedDevice, text: &str) {
    device
        .lock()
        .unwrap()
        .inbound
        .push_back(Ok(text.as_bytes().to_vec()));
}

pub fn push_bytes(device: &SharedDevice, bytes: &[u8]) {
    device.lock().unwrap().inbound.push_back(Ok(bytes.to_vec()));
}

pub fn written(device: &SharedDevice) -> Vec<String> {
    device.lock().unwrap().written.clone()
}

struct MockTransport {
    name: String,
    device: SharedDevice,
}

impl Transport for MockTransport {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_open(&self) -> bool {
        self.device.lock().unwrap().open
    }

    fn read_lines(&mut self) -> io::Result<Vec<u8>> {
        self.device
            .lock()
            .unwrap()
            .inbound
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    fn write(&mut self, data: &[u8]) -> io::Result<()> {
        let mut device = self.device.lock().unwrap();
        if device.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "device unplugged"));
        }
        device.written.push(String::from_utf8_lossy(data).to_string());
        Ok(())
    }

    fn flush_input(&mut self) -> io::Result<()> {
        let mut device = self.device.lock().unwrap();
        device.input_flushes += 1;
        if device.fail_teardown {
            return Err(io::Error::new(io::ErrorKind::Other, "flush input failed"));
        }
        device.inbound.clear();
        Ok(())
    }

    fn flush_output(&mut self) -> io::Result<()> {
        let mut device = self.device.lock().unwrap();
        device.output_flushes += 1;
        if device.fail_teardown {
            return Err(io::Error::new(io::ErrorKind::Other, "flush output failed"));
        }
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        let mut device = self.device.lock().unwrap();
        device.closes += 1;
        if device.fail_teardown {
            return Err(io::Error::new(io::ErrorKind::Other, "close failed"));
        }
        device.open = false;
        Ok(())
    }
}

pub struct MockFactory {
    device: SharedDevice,
}

impl TransportFactory for MockFactory {
    fn open(&self, params: &ConnectionParams) -> Result<Box<dyn Transport>, ConnectionError> {
        let mut device = self.device.lock().unwrap();
        device.opened_with.push(params.clone());
        if device.refuse_open {
            return Err(ConnectionError::failed_to_open(
                &params.port,
                "No such file or directory",
            ));
        }
        device.open = true;
        Ok(Box::new(MockTransport {
            name: params.port.clone(),
            device: self.device.clone(),
        }))
    }
}

pub fn session_with(config: &Config) -> (SessionManager<MockFactory>, SharedDevice) {
    let device = SharedDevice::default();
    let factory = MockFactory {
        device: device.clone(),
    };
    (SessionManager::new(factory, config), device)
}

pub fn session() -> (SessionManager<MockFactory>, SharedDevice) {
    session_with(&Config::default())
}

pub fn connected_session() -> (SessionManager<MockFactory>, SharedDevice) {
    let (mut session, device) = session();
    session.connect(MOCK_PORT, 115_200);
    assert!(session.is_connected());
    (session, device)
}
