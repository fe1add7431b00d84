use crate::error::{PtzError, Result};
use crate::onvif::types::Profile;
use crate::xml::Element;

pub const GET_PROFILES: &str = "<trt:GetProfiles/>";

pub fn parse_profiles(payload: &Element) -> Result<Vec<Profile>> {
    if payload.name != "GetProfilesResponse" {
        return Err(PtzError::Protocol(format!(
            "unexpected profiles response <{}>",
            payload.name
        )));
    }

    let profiles = payload
        .children_named("Profiles")
        .map(|profile| Profile {
            token: profile.attr("token").unwrap_or_default().to_string(),
            name: profile.child_text("Name").unwrap_or_default().to_string(),
            video_source_token: profile
                .child("VideoSourceConfiguration")
                .and_then(|vsc| vsc.child_text("SourceToken"))
                .unwrap_or_default()
                .to_string(),
        })
        .collect();

    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onvif::soap::response_payload;

    #[test]
    fn test_parse_profiles() {
        let xml = r#"<env:Envelope xmlns:env="http://www.w3.org/2003/05/soap-envelope" xmlns:trt="http://www.onvif.org/ver10/media/wsdl" xmlns:tt="http://www.onvif.org/ver10/schema">
  <env:Body>
    <trt:GetProfilesResponse>
      <trt:Profiles token="Profile_1" fixed="true">
        <tt:Name>mainStream</tt:Name>
        <tt:VideoSourceConfiguration token="VideoSourceToken">
          <tt:Name>VideoSourceConfig</tt:Name>
          <tt:SourceToken>VideoSource_1</tt:SourceToken>
        </tt:VideoSourceConfiguration>
      </trt:Profiles>
      <trt:Profiles token="Profile_2" fixed="true">
        <tt:Name>subStream</tt:Name>
      </trt:Profiles>
    </trt:GetProfilesResponse>
  </env:Body>
</env:Envelope>"#;

        let profiles = parse_profiles(&response_payload(xml).unwrap()).unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].token, "Profile_1");
        assert_eq!(profiles[0].name, "mainStream");
        assert_eq!(profiles[0].video_source_token, "VideoSource_1");
        assert_eq!(profiles[1].video_source_token, "");
    }

    #[test]
    fn test_parse_empty_profile_list() {
        let payload = Element {
            name: "GetProfilesResponse".to_string(),
            ..Default::default()
        };
        assert!(parse_profiles(&payload).unwrap().is_empty());
    }
}
