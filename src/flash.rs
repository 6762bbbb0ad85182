use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;

const FLASH_COOKIE: &str = "flash";

/// One-shot message carried across the form redirect.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Flash {
    pub success: Option<String>,
    pub errors: Vec<String>,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: Some(message.into()),
            errors: Vec::new(),
        }
    }

    pub fn errors(errors: Vec<String>) -> Self {
        Self {
            success: None,
            errors,
        }
    }

    fn encode(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        if let Some(msg) = &self.success {
            out.append_pair("success", msg);
        }
        for err in &self.errors {
            out.append_pair("error", err);
        }
        out.finish()
    }

    fn decode(raw: &str) -> Self {
        let mut flash = Flash::default();
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            match key.as_ref() {
                "success" => flash.success = Some(value.into_owned()),
                "error" => flash.errors.push(value.into_owned()),
                _ => {}
            }
        }
        flash
    }

    pub fn write(&self, jar: CookieJar) -> CookieJar {
        let cookie = Cookie::build((FLASH_COOKIE, self.encode()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build();
        jar.add(cookie)
    }

    /// Read and clear the flash, if any.
    pub fn take(jar: CookieJar) -> (CookieJar, Option<Flash>) {
        let Some(raw) = jar.get(FLASH_COOKIE).map(|c| c.value().to_string()) else {
            return (jar, None);
        };
        let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
        (jar, Some(Flash::decode(&raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn written_flash_can_be_taken_once() {
        let flash = Flash::errors(vec![
            "The password field must be at least 6 characters.".to_string(),
            "The password field confirmation does not match.".to_string(),
        ]);
        let jar = flash.write(CookieJar::new());

        let (jar, taken) = Flash::take(jar);
        assert_eq!(taken, Some(flash));
        assert!(jar.get(FLASH_COOKIE).is_none());
    }

    #[test]
    fn encoded_flash_is_a_valid_cookie_value() {
        let encoded = Flash::success("Password reset successful; done, \"ok\"").encode();
        assert!(!encoded.contains([' ', ';', ',', '"']));
        assert_eq!(
            Flash::decode(&encoded).success.as_deref(),
            Some("Password reset successful; done, \"ok\"")
        );
    }
}
