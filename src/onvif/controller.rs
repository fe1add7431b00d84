use async_trait::async_trait;

use crate::error::{PtzError, Result};
use crate::onvif::client::SoapClient;
use crate::onvif::types::{DeviceInformation, PtzVector, ServiceEndpoints, DEVICE_SERVICE_PATH};
use crate::onvif::{device, media, ptz};
use crate::ptz::units;
use crate::ptz::{ControllerConfig, ImageSettings, Preset, PtzController, Status};
use crate::xml::Element;

/// State discovered by `connect`; only stored once discovery fully succeeds.
#[derive(Debug, Clone)]
struct Session {
    device: DeviceInformation,
    endpoints: ServiceEndpoints,
    profile_token: String,
    video_source_token: String,
}

pub struct OnvifController {
    client: SoapClient,
    session: Option<Session>,
}

impl OnvifController {
    pub fn new(config: &ControllerConfig) -> Result<Self> {
        Ok(Self {
            client: SoapClient::new(config)?,
            session: None,
        })
    }

    pub fn profile_token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.profile_token.as_str())
    }

    pub fn video_source_token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.video_source_token.as_str())
    }

    pub fn device_information(&self) -> Option<&DeviceInformation> {
        self.session.as_ref().map(|s| &s.device)
    }

    async fn ensure_connected(&mut self) -> Result<Session> {
        if self.session.is_none() {
            self.connect().await?;
        }
        self.session
            .clone()
            .ok_or_else(|| PtzError::Connection("ONVIF session not established".to_string()))
    }

    async fn ptz_call(&self, session: &Session, action: &str, body: String) -> Result<Element> {
        self.client.call(&session.endpoints.ptz, action, &body).await
    }

    async fn discover(&self) -> Result<Session> {
        let info = self
            .client
            .call(DEVICE_SERVICE_PATH, "GetDeviceInformation", device::GET_DEVICE_INFORMATION)
            .await
            .and_then(|payload| device::parse_device_information(&payload))
            .map_err(|e| PtzError::Connection(format!("device probe failed: {}", e)))?;

        tracing::info!(
            "Connected to {} {} (firmware {}) at {}",
            info.manufacturer,
            info.model,
            info.firmware_version,
            self.client.base_url()
        );

        let endpoints = match self
            .client
            .call(DEVICE_SERVICE_PATH, "GetCapabilities", device::GET_CAPABILITIES)
            .await
        {
            Ok(payload) => device::parse_service_endpoints(&payload),
            Err(e) => {
                tracing::warn!("GetCapabilities failed, using default service paths: {}", e);
                ServiceEndpoints::default()
            }
        };

        let profiles = self
            .client
            .call(&endpoints.media, "GetProfiles", media::GET_PROFILES)
            .await
            .and_then(|payload| media::parse_profiles(&payload))
            .map_err(|e| PtzError::Connection(format!("failed to get profiles: {}", e)))?;

        let profile = profiles
            .into_iter()
            .next()
            .ok_or_else(|| PtzError::Connection("no media profiles found".to_string()))?;

        tracing::debug!(
            "Using media profile {} ({}), video source {}",
            profile.token,
            profile.name,
            profile.video_source_token
        );

        Ok(Session {
            device: info,
            endpoints,
            profile_token: profile.token,
            video_source_token: profile.video_source_token,
        })
    }
}

#[async_trait]
impl PtzController for OnvifController {
    async fn connect(&mut self) -> Result<()> {
        self.session = None;
        let session = self.discover().await?;
        self.session = Some(session);
        Ok(())
    }

    async fn move_ptz(&mut self, pan: i32, tilt: i32, zoom: i32) -> Result<()> {
        let session = self.ensure_connected().await?;
        let velocity = PtzVector {
            pan: units::to_onvif(pan),
            tilt: units::to_onvif(tilt),
            zoom: units::to_onvif(zoom),
        };
        self.ptz_call(&session, "ContinuousMove", ptz::continuous_move(&session.profile_token, velocity))
            .await?;
        Ok(())
    }

    async fn relative_move(&mut self, pan: i32, tilt: i32, zoom: i32) -> Result<()> {
        let session = self.ensure_connected().await?;
        let translation = PtzVector {
            pan: units::to_onvif(pan),
            tilt: units::to_onvif(tilt),
            zoom: units::to_onvif(zoom),
        };
        self.ptz_call(&session, "RelativeMove", ptz::relative_move(&session.profile_token, translation))
            .await?;
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        let session = self.ensure_connected().await?;
        self.ptz_call(&session, "Stop", ptz::stop(&session.profile_token)).await?;
        Ok(())
    }

    async fn get_status(&mut self) -> Result<Status> {
        let session = self.ensure_connected().await?;
        let payload = self
            .ptz_call(&session, "GetStatus", ptz::get_status(&session.profile_token))
            .await?;
        let position = ptz::parse_position(&payload)?;
        Ok(units::onvif_position_to_status(position.pan, position.tilt, position.zoom))
    }

    async fn get_presets(&mut self) -> Result<Vec<Preset>> {
        let session = self.ensure_connected().await?;
        let payload = self
            .ptz_call(&session, "GetPresets", ptz::get_presets(&session.profile_token))
            .await?;
        Ok(ptz::parse_presets(&payload))
    }

    async fn goto_preset(&mut self, preset_id: i32) -> Result<()> {
        let session = self.ensure_connected().await?;
        let body = ptz::goto_preset(&session.profile_token, &preset_id.to_string());
        self.ptz_call(&session, "GotoPreset", body).await?;
        Ok(())
    }

    async fn set_preset(&mut self, preset_id: i32, name: &str) -> Result<()> {
        let session = self.ensure_connected().await?;
        let name = if name.is_empty() {
            format!("Preset{}", preset_id)
        } else {
            name.to_string()
        };
        let body = ptz::set_preset(&session.profile_token, &preset_id.to_string(), &name);
        self.ptz_call(&session, "SetPreset", body).await?;
        Ok(())
    }

    async fn delete_preset(&mut self, preset_id: i32) -> Result<()> {
        let session = self.ensure_connected().await?;
        let body = ptz::remove_preset(&session.profile_token, &preset_id.to_string());
        self.ptz_call(&session, "RemovePreset", body).await?;
        Ok(())
    }

    // Focus rides the zoom velocity channel of ContinuousMove.
    async fn focus(&mut self, speed: i32) -> Result<()> {
        if speed == 0 {
            return self.stop().await;
        }

        let session = self.ensure_connected().await?;
        let velocity = PtzVector {
            pan: 0.0,
            tilt: 0.0,
            zoom: units::to_onvif(speed),
        };
        self.ptz_call(&session, "ContinuousMove", ptz::continuous_move(&session.profile_token, velocity))
            .await
            .map_err(|e| match e {
                PtzError::Protocol(msg) => PtzError::Protocol(format!("focus failed: {}", msg)),
                other => other,
            })?;
        Ok(())
    }

    async fn iris(&mut self, _speed: i32) -> Result<()> {
        Err(PtzError::Unsupported(
            "iris control is not supported over ONVIF (use ISAPI if the camera offers it)".to_string(),
        ))
    }

    // TODO: query the Imaging service (GetImagingSettings on the video source token)
    // instead of returning neutral values.
    async fn get_image_settings(&mut self) -> Result<ImageSettings> {
        self.ensure_connected().await?;
        Ok(ImageSettings {
            brightness: 50,
            contrast: 50,
            saturation: 50,
            sharpness: 50,
        })
    }
}
