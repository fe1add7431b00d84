use async_trait::async_trait;

use crate::error::Result;
use crate::isapi::client::IsapiClient;
use crate::isapi::types::{self, LensControl};
use crate::ptz::units;
use crate::ptz::{ControllerConfig, ImageSettings, Preset, PtzController, Status};

/// PTZ control over Hikvision ISAPI. Holds no session state between calls.
pub struct IsapiController {
    client: IsapiClient,
}

impl IsapiController {
    pub fn new(config: &ControllerConfig) -> Result<Self> {
        Ok(Self {
            client: IsapiClient::new(config)?,
        })
    }

    async fn lens(&self, control: LensControl, speed: i32) -> Result<()> {
        let body = types::lens_body(control, units::to_isapi(speed));
        self.client.put(&types::continuous_path(), body).await?;
        Ok(())
    }
}

#[async_trait]
impl PtzController for IsapiController {
    /// Nothing to keep open; a status query checks reachability and credentials.
    async fn connect(&mut self) -> Result<()> {
        self.get_status().await?;
        Ok(())
    }

    /// Momentary moves stop on their own, so no timeout is sent.
    async fn move_ptz(&mut self, pan: i32, tilt: i32, zoom: i32) -> Result<()> {
        let body = types::momentary_body(
            units::to_isapi(pan),
            units::to_isapi(tilt),
            units::to_isapi(zoom),
        );
        self.client.put(&types::momentary_path(), body).await?;
        Ok(())
    }

    async fn relative_move(&mut self, pan: i32, tilt: i32, zoom: i32) -> Result<()> {
        self.move_ptz(pan, tilt, zoom).await
    }

    async fn stop(&mut self) -> Result<()> {
        self.move_ptz(0, 0, 0).await
    }

    async fn get_status(&mut self) -> Result<Status> {
        let xml = self.client.get(&types::status_path()).await?;
        types::parse_status(&xml)
    }

    async fn get_presets(&mut self) -> Result<Vec<Preset>> {
        let xml = self.client.get(&types::presets_path()).await?;
        types::parse_presets(&xml)
    }

    async fn goto_preset(&mut self, preset_id: i32) -> Result<()> {
        self.client
            .put(&types::goto_preset_path(preset_id), types::goto_preset_body(preset_id))
            .await?;
        Ok(())
    }

    async fn set_preset(&mut self, preset_id: i32, name: &str) -> Result<()> {
        let name = types::preset_name(preset_id, name);
        self.client
            .put(&types::preset_path(preset_id), types::preset_body(preset_id, &name))
            .await?;
        Ok(())
    }

    async fn delete_preset(&mut self, preset_id: i32) -> Result<()> {
        self.client.delete(&types::preset_path(preset_id)).await?;
        Ok(())
    }

    async fn focus(&mut self, speed: i32) -> Result<()> {
        self.lens(LensControl::Focus, speed).await
    }

    async fn iris(&mut self, speed: i32) -> Result<()> {
        self.lens(LensControl::Iris, speed).await
    }

    async fn get_image_settings(&mut self) -> Result<ImageSettings> {
        let xml = self.client.get(types::IMAGE_CHANNEL_PATH).await?;
        types::parse_image_settings(&xml)
    }
}
