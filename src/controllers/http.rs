use embedded_hal_async::delay::DelayNs;

use crate::{
    app::usecases::{
        LightError, LightUsecases, ProtocolError, authorize, decode_request,
    },
    config::{ControlConfig, RESET_DELAY_MS},
    core::net::http::{
        Connection, Error as HttpError, HttpConnection, HttpHandler,
    },
    domain::{
        dto::Command,
        entity::LightState,
        ports::{PwmPort, SystemReset},
    },
};

/// Failure of one control cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlError {
    /// Connection level failure, the node keeps serving
    Http(HttpError),
    /// PWM failure, fatal to the node
    Light(LightError),
}

impl From<HttpError> for ControlError {
    fn from(err: HttpError) -> Self {
        ControlError::Http(err)
    }
}

impl From<LightError> for ControlError {
    fn from(err: LightError) -> Self {
        ControlError::Light(err)
    }
}

/// How a handled request ended
enum Outcome {
    /// Reply sent, lights follow the state
    Applied,
    /// Reply sent, node is rebooting
    Reset,
}

/// JSON control endpoint.
///
/// Each cycle reads one POST, answers with the full light state, closes
/// the connection and only then runs the command and fades the outputs.
pub struct LightHttpController<P: PwmPort, D: DelayNs, R: SystemReset> {
    light: LightUsecases<P, D>,
    reset: R,
    config: ControlConfig,
}

impl<P: PwmPort, D: DelayNs, R: SystemReset> LightHttpController<P, D, R> {
    pub fn new(
        light: LightUsecases<P, D>,
        reset: R,
        config: ControlConfig,
    ) -> Self {
        Self {
            light,
            reset,
            config,
        }
    }

    pub fn light(&self) -> &LightUsecases<P, D> {
        &self.light
    }

    pub fn light_state(&self) -> &LightState {
        self.light.light_state()
    }

    /// Decode, authorize and merge a request body.
    ///
    /// The state is only touched once the request is known to be valid.
    fn accept(
        &mut self,
        body: &[u8],
    ) -> Result<Option<Command>, ProtocolError> {
        let request = decode_request(body)?;
        authorize(&request, self.config.auth_secret)?;
        let command = request.command();
        if let Some(patch) = request.state {
            self.light.apply_patch(patch);
        }
        Ok(command)
    }

    async fn run_command(
        &mut self,
        command: Option<Command>,
    ) -> Result<Outcome, LightError> {
        match command {
            Some(Command::Reset) => {
                log::info!("control: reset requested");
                self.light.hold(RESET_DELAY_MS).await;
                self.reset.reset();
                return Ok(Outcome::Reset);
            }
            Some(Command::Demo) => self.light.demo().await?,
            Some(Command::Unknown(name)) => {
                log::warn!(
                    "control: ignoring unknown command {}",
                    name.as_str()
                );
            }
            None => {}
        }
        Ok(Outcome::Applied)
    }
}

impl<P: PwmPort, D: DelayNs, R: SystemReset> HttpHandler
    for LightHttpController<P, D, R>
{
    type Error = ControlError;

    async fn handle_request<C: Connection>(
        &mut self,
        conn: HttpConnection<'_, C>,
    ) -> Result<(), ControlError> {
        let mut conn = conn;
        let request = match conn.read_request().await {
            Ok(request) => request,
            Err(HttpError::Framing(err)) => {
                log::warn!("control: bad request: {:?}", err);
                let sent = conn.write_error(400).await;
                conn.close().await;
                return sent.map_err(ControlError::from);
            }
            Err(err) => {
                conn.close().await;
                return Err(err.into());
            }
        };
        log::debug!(
            "control: IN {} {}",
            request.path.as_str(),
            core::str::from_utf8(&request.body).unwrap_or("<binary>")
        );

        let command = match self.accept(&request.body) {
            Ok(command) => command,
            Err(err) => {
                let sent = conn.write_error(err.status()).await;
                conn.close().await;
                return sent.map_err(ControlError::from);
            }
        };

        // The reply reflects the state before the command runs
        let sent = conn.write_json(self.light.light_state()).await;
        conn.close().await;
        if let Err(err) = sent {
            log::warn!("control: response not delivered: {:?}", err);
        }

        match self.run_command(command).await? {
            Outcome::Reset => Ok(()),
            Outcome::Applied => Ok(self.light.apply_lights().await?),
        }
    }
}
