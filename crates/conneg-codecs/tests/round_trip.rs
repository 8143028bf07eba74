use conneg_codecs::{FormCodec, JsonCodec, MessagePackCodec, YamlCodec};
use conneg_core::codec::{Codec, Decoder, Encoder};
use conneg_core::content::Content;
use rstest::rstest;
use serde_json::json;

fn sample() -> Content {
	json!({
		"id": 42,
		"name": "widget",
		"price": 9.5,
		"tags": ["a", "b"],
		"owner": {"name": "ann", "active": true},
		"note": null,
		"delta": -3
	})
}

#[rstest]
#[case::json(Box::new(JsonCodec::new()) as Box<dyn Codec>)]
#[case::json_pretty(Box::new(JsonCodec::new().pretty(true)) as Box<dyn Codec>)]
#[case::yaml(Box::new(YamlCodec::new()) as Box<dyn Codec>)]
#[case::msgpack(Box::new(MessagePackCodec::new()) as Box<dyn Codec>)]
fn test_structured_round_trip(#[case] codec: Box<dyn Codec>) {
	let content = sample();

	let bytes = codec.encode(&content).unwrap();
	let decoded = codec.decode(&bytes).unwrap();

	assert_eq!(decoded, content);
}

#[rstest]
fn test_form_round_trip_of_flat_strings() {
	let content = json!({"q": "rust & http", "page": "2", "tag": ["x", "y"]});
	let codec = FormCodec::new();

	let decoded = codec.decode(&codec.encode(&content).unwrap()).unwrap();

	assert_eq!(decoded, content);
}

#[rstest]
fn test_yaml_reads_json_written_by_json_codec() {
	// JSON is a subset of YAML 1.2
	let bytes = JsonCodec::new().encode(&sample()).unwrap();

	assert_eq!(YamlCodec::new().decode(&bytes).unwrap(), sample());
}
