use serde::Serialize;
use serde_json::json;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Serialize `value` as JSON indented with four spaces.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
	let mut buf = Vec::new();
	let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
	value.serialize(&mut serializer)?;
	Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Generate the starter `postbuild.config.json` written by `--init`.
pub fn generate_init_template() -> serde_json::Result<String> {
	let template = json!({
		"esmDir": "auto",
		"cjsDir": "auto",
		"verbose": true,
		"copyFiles": {
			"from": "src",
			"exclude": [".js"]
		},
		"addExtensions": true
	});

	to_pretty_json(&template).map(|mut content| {
		content.push('\n');
		content
	})
}
