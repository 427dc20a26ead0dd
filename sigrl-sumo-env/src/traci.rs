//! Client of the TraCI protocol of SUMO.
mod constants;
mod launcher;
mod message;
use crate::{Connector, SimClient, SimError};
use anyhow::Result;
use constants::*;
pub use launcher::{SumoProcess, TraciConfig};
use log::trace;
use message::{frame, put_command, put_string, Reader};
use std::{
    io::{Read, Write},
    net::{Shutdown, TcpStream, ToSocketAddrs},
};

/// A TraCI connection to a SUMO process.
///
/// Commands are sent one at a time and every call blocks until SUMO has answered.
/// If the client owns the SUMO process, the process is killed when the client is
/// dropped without being closed.
pub struct TraciClient {
    stream: TcpStream,
    process: Option<SumoProcess>,
    closed: bool,
}

impl TraciClient {
    /// Connects to a SUMO instance that is already listening on `addr`.
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self, SimError> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        Ok(Self::new(stream, None))
    }

    fn new(stream: TcpStream, process: Option<SumoProcess>) -> Self {
        Self {
            stream,
            process,
            closed: false,
        }
    }

    /// Sends one command and returns the body of the response after the status.
    fn send_command(&mut self, id: u8, payload: &[u8]) -> Result<Vec<u8>, SimError> {
        if self.closed {
            return Err(SimError::Closed);
        }
        let mut buf = vec![];
        put_command(&mut buf, id, payload);
        self.stream.write_all(&frame(&buf))?;

        let mut len = [0u8; 4];
        self.stream.read_exact(&mut len)?;
        let len = i32::from_be_bytes(len);
        if len < 4 {
            return Err(SimError::Protocol(format!("message length {}", len)));
        }
        let mut body = vec![0u8; len as usize - 4];
        self.stream.read_exact(&mut body)?;

        let mut rdr = Reader::new(&body);
        rdr.read_command_len()?;
        let ret_id = rdr.read_u8()?;
        let status = rdr.read_u8()?;
        let description = rdr.read_string()?;
        if ret_id != id {
            return Err(SimError::Protocol(format!(
                "status of command 0x{:02x} for command 0x{:02x}",
                ret_id, id
            )));
        }
        match status {
            RTYPE_OK => {}
            RTYPE_NOTIMPLEMENTED | RTYPE_ERR => {
                return Err(SimError::Command {
                    cmd: id,
                    status,
                    description,
                })
            }
            s => {
                return Err(SimError::Protocol(format!("unknown status 0x{:02x}", s)));
            }
        }
        Ok(rdr.rest().to_vec())
    }

    /// Retrieves a variable and returns its value, starting at the type tag.
    fn get_variable(&mut self, domain: u8, var: u8, object: &str) -> Result<Vec<u8>, SimError> {
        let mut payload = vec![var];
        put_string(&mut payload, object);
        let body = self.send_command(domain, &payload)?;

        let mut rdr = Reader::new(&body);
        rdr.read_command_len()?;
        let response = rdr.read_u8()?;
        let ret_var = rdr.read_u8()?;
        let ret_object = rdr.read_string()?;
        if response != domain + RESPONSE_OFFSET || ret_var != var || ret_object != object {
            return Err(SimError::Protocol(format!(
                "response 0x{:02x}/0x{:02x}/{} to request 0x{:02x}/0x{:02x}/{}",
                response, ret_var, ret_object, domain, var, object
            )));
        }
        Ok(rdr.rest().to_vec())
    }
}

impl SimClient for TraciClient {
    fn simulation_step(&mut self) -> Result<(), SimError> {
        // Target time 0 advances by one step. Subscription results are ignored.
        self.send_command(CMD_SIMSTEP, &0f64.to_be_bytes())?;
        Ok(())
    }

    fn induction_loop_ids(&mut self) -> Result<Vec<String>, SimError> {
        let value = self.get_variable(CMD_GET_INDUCTIONLOOP_VARIABLE, ID_LIST, "")?;
        let mut rdr = Reader::new(&value);
        rdr.expect_type(TYPE_STRINGLIST)?;
        rdr.read_string_list()
    }

    fn lane_of_detector(&mut self, detector: &str) -> Result<String, SimError> {
        let value = self.get_variable(CMD_GET_INDUCTIONLOOP_VARIABLE, VAR_LANE_ID, detector)?;
        let mut rdr = Reader::new(&value);
        rdr.expect_type(TYPE_STRING)?;
        rdr.read_string()
    }

    fn halting_vehicle_count(&mut self, lane: &str) -> Result<u32, SimError> {
        let value =
            self.get_variable(CMD_GET_LANE_VARIABLE, LAST_STEP_VEHICLE_HALTING_NUMBER, lane)?;
        let mut rdr = Reader::new(&value);
        rdr.expect_type(TYPE_INTEGER)?;
        let n = rdr.read_i32()?;
        trace!("halting number of {} = {}", lane, n);
        Ok(n.max(0) as u32)
    }

    fn set_phase(&mut self, tls: &str, phase: usize) -> Result<(), SimError> {
        let mut payload = vec![TL_PHASE_INDEX];
        put_string(&mut payload, tls);
        payload.push(TYPE_INTEGER);
        payload.extend_from_slice(&(phase as i32).to_be_bytes());
        self.send_command(CMD_SET_TL_VARIABLE, &payload)?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), SimError> {
        if self.closed {
            return Ok(());
        }
        let result = self.send_command(CMD_CLOSE, &[]);
        self.closed = true;
        let _ = self.stream.shutdown(Shutdown::Both);
        result?;
        if let Some(process) = self.process.take() {
            process.wait()?;
        }
        Ok(())
    }
}

/// Launches SUMO as a child process and connects [`TraciClient`] to it.
pub struct TraciConnector;

impl Connector for TraciConnector {
    type Config = TraciConfig;
    type Client = TraciClient;

    fn connect(config: &Self::Config) -> Result<Self::Client> {
        let (stream, process) = launcher::launch(config)?;
        Ok(TraciClient::new(stream, Some(process)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use message::put_string_list;
    use std::{net::TcpListener, thread};

    /// Answers every request of one connection from a closure, until `CMD_CLOSE`.
    fn fake_server<F>(respond: F) -> (u16, thread::JoinHandle<Vec<u8>>)
    where
        F: Fn(u8, &[u8]) -> Vec<u8> + Send + 'static,
    {
        let listener = TcpListener::bind(("127.0.0.1", 0)).unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut ids = vec![];
            loop {
                let mut len = [0u8; 4];
                if stream.read_exact(&mut len).is_err() {
                    break;
                }
                let mut body = vec![0u8; i32::from_be_bytes(len) as usize - 4];
                stream.read_exact(&mut body).unwrap();
                let mut rdr = Reader::new(&body);
                rdr.read_command_len().unwrap();
                let id = rdr.read_u8().unwrap();
                ids.push(id);
                stream.write_all(&frame(&respond(id, rdr.rest()))).unwrap();
                if id == CMD_CLOSE {
                    break;
                }
            }
            ids
        });
        (port, handle)
    }

    fn status(buf: &mut Vec<u8>, id: u8, result: u8, description: &str) {
        let mut payload = vec![result];
        put_string(&mut payload, description);
        put_command(buf, id, &payload);
    }

    fn respond(id: u8, payload: &[u8]) -> Vec<u8> {
        let mut buf = vec![];
        match id {
            CMD_SET_TL_VARIABLE => {
                let mut rdr = Reader::new(payload);
                rdr.read_u8().unwrap();
                rdr.read_string().unwrap();
                rdr.expect_type(TYPE_INTEGER).unwrap();
                if rdr.read_i32().unwrap() < 4 {
                    status(&mut buf, id, RTYPE_OK, "");
                } else {
                    status(&mut buf, id, RTYPE_ERR, "phase index out of range");
                }
            }
            CMD_GET_INDUCTIONLOOP_VARIABLE | CMD_GET_LANE_VARIABLE => {
                let mut rdr = Reader::new(payload);
                let var = rdr.read_u8().unwrap();
                let object = rdr.read_string().unwrap();
                status(&mut buf, id, RTYPE_OK, "");
                let mut response = vec![var];
                put_string(&mut response, &object);
                match var {
                    ID_LIST => {
                        response.push(TYPE_STRINGLIST);
                        put_string_list(&mut response, &["det_a".into(), "det_b".into()]);
                    }
                    VAR_LANE_ID => {
                        response.push(TYPE_STRING);
                        put_string(&mut response, &object.replace("det", "lane"));
                    }
                    _ => {
                        response.push(TYPE_INTEGER);
                        response.extend_from_slice(&5i32.to_be_bytes());
                    }
                }
                put_command(&mut buf, id + RESPONSE_OFFSET, &response);
            }
            CMD_SIMSTEP => {
                status(&mut buf, id, RTYPE_OK, "");
                buf.extend_from_slice(&0i32.to_be_bytes());
            }
            _ => status(&mut buf, id, RTYPE_OK, ""),
        }
        buf
    }

    #[test]
    fn test_traci_exchange() -> Result<()> {
        let _ = env_logger::builder().is_test(true).try_init();
        let (port, server) = fake_server(respond);
        let mut client = TraciClient::connect(("127.0.0.1", port))?;

        let ids = client.induction_loop_ids()?;
        assert_eq!(ids, vec!["det_a", "det_b"]);
        assert_eq!(client.lane_of_detector("det_b")?, "lane_b");
        assert_eq!(client.halting_vehicle_count("lane_a")?, 5);
        client.set_phase("0", 2)?;
        client.simulation_step()?;
        match client.set_phase("0", 4) {
            Err(SimError::Command {
                cmd,
                status,
                description,
            }) => {
                assert_eq!(cmd, CMD_SET_TL_VARIABLE);
                assert_eq!(status, RTYPE_ERR);
                assert_eq!(description, "phase index out of range");
            }
            r => panic!("unexpected result {:?}", r),
        }
        client.close()?;
        assert!(matches!(client.simulation_step(), Err(SimError::Closed)));

        let ids = server.join().unwrap();
        assert_eq!(
            ids,
            vec![
                CMD_GET_INDUCTIONLOOP_VARIABLE,
                CMD_GET_INDUCTIONLOOP_VARIABLE,
                CMD_GET_LANE_VARIABLE,
                CMD_SET_TL_VARIABLE,
                CMD_SIMSTEP,
                CMD_SET_TL_VARIABLE,
                CMD_CLOSE,
            ]
        );
        Ok(())
    }
}
