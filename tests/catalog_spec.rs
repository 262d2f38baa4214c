mod common;

use chrono::{TimeZone, Utc};
use common::{label, object};
use speculate2::speculate;
use vision_ai_console::models::*;

speculate! {
    describe "derive_label_options" {
        it "returns nothing for an empty catalog" {
            assert!(derive_label_options(&[]).is_empty());
        }

        it "flattens labels in catalog order" {
            let objects = vec![
                object("rain", &["true", "false"]),
                object("water_level", &["low", "medium", "high"]),
            ];

            let values: Vec<String> = derive_label_options(&objects)
                .into_iter()
                .map(|o| o.value)
                .collect();

            assert_eq!(values, vec!["true", "false", "low", "medium", "high"]);
        }

        it "sorts labels by their order within each object" {
            let mut water = object("water_level", &["high", "low", "other", "medium"]);
            water.labels[0].order = Some(3);
            water.labels[1].order = Some(1);
            water.labels[3].order = Some(2);
            let objects = vec![object("rain", &["true", "false"]), water];

            let values: Vec<String> = derive_label_options(&objects)
                .into_iter()
                .map(|o| o.value)
                .collect();

            assert_eq!(values, vec!["true", "false", "low", "medium", "high", "other"]);
        }

        it "annotates each option with its owning object" {
            let objects = vec![object("rain", &["true"])];

            let options = derive_label_options(&objects);

            assert_eq!(options.len(), 1);
            assert_eq!(options[0].object_id, objects[0].id);
            assert_eq!(options[0].object_name, "rain");
            assert_eq!(options[0].object_slug, "rain");
            assert_eq!(options[0].label_id, objects[0].labels[0].id);
            assert_eq!(options[0].text, "Text true");
        }

        it "drops null labels from regular objects" {
            let objects = vec![
                object("rain", &["true", "null", "false"]),
                object("water_level", &["null", "low"]),
            ];

            let options = derive_label_options(&objects);

            assert!(options.iter().all(|o| o.value != NULL_LABEL));
            assert_eq!(options.iter().filter(|o| o.object_slug == "rain").count(), 2);
            assert_eq!(options.iter().filter(|o| o.object_slug == "water_level").count(), 1);
        }

        it "keeps the null label of the image description" {
            let objects = vec![object(IMAGE_DESCRIPTION, &["null"])];

            let options = derive_label_options(&objects);

            assert_eq!(options.len(), 1);
            assert_eq!(options[0].value, NULL_LABEL);
        }

        it "recognizes the image description by name as well as slug" {
            let mut description = object("descricao", &["null"]);
            description.name = IMAGE_DESCRIPTION.to_string();

            assert!(description.is_image_description());
            assert_eq!(derive_label_options(&[description]).len(), 1);
        }

        it "keeps criteria and identification guides" {
            let mut rain = object("rain", &[]);
            let mut true_label = label("true");
            true_label.criteria = Some("Visible raindrops".to_string());
            true_label.identification_guide = Some("Look at the lens".to_string());
            rain.labels.push(true_label);

            let options = derive_label_options(&[rain]);

            assert_eq!(options[0].criteria.as_deref(), Some("Visible raindrops"));
            assert_eq!(options[0].identification_guide.as_deref(), Some("Look at the lens"));
        }
    }

    describe "page envelope" {
        it "treats a missing page count as one page" {
            let page: Page<String> = serde_json::from_str(r#"{"items": []}"#).unwrap();
            assert_eq!(page.page_count(), 1);
        }

        it "treats a null page count as one page" {
            let page: Page<String> =
                serde_json::from_str(r#"{"items": [], "pages": null, "total": 0}"#).unwrap();
            assert_eq!(page.page_count(), 1);
        }

        it "reads the page count" {
            let page: Page<String> =
                serde_json::from_str(r#"{"items": ["a"], "page": 1, "pages": 4}"#).unwrap();
            assert_eq!(page.page_count(), 4);
            assert_eq!(page.items, vec!["a"]);
        }
    }

    describe "identification" {
        it "parses the queue payload" {
            let raw = r#"{
                "id": "0b8e5c1e-8d0f-4f4e-9d3e-2f2f6a2b7c11",
                "object": "rain",
                "question": "Is it raining?",
                "explanation": "Look for drops",
                "snapshot": {"image_url": "https://storage/img1.png"},
                "status": "pending"
            }"#;

            let item: Identification = serde_json::from_str(raw).unwrap();

            assert_eq!(item.object, "rain");
            assert_eq!(item.image_url(), "https://storage/img1.png");
            assert_eq!(item.status.as_deref(), Some("pending"));
            assert!(item.label.is_none());
        }

        it "reads naive timestamps as UTC" {
            let raw = r#"{"items": [{
                "id": "0b8e5c1e-8d0f-4f4e-9d3e-2f2f6a2b7c11",
                "object": "rain",
                "timestamp": "2024-05-06T18:04:17.123456",
                "snapshot": {
                    "image_url": "https://storage/img1.png",
                    "timestamp": "2024-05-06 18:04:00"
                }
            }], "pages": 1}"#;

            let page: Page<Identification> = serde_json::from_str(raw).unwrap();

            let item = &page.items[0];
            let expected = Utc.with_ymd_and_hms(2024, 5, 6, 18, 4, 17).unwrap()
                + chrono::Duration::microseconds(123_456);
            assert_eq!(item.timestamp, Some(expected));
            assert_eq!(
                item.snapshot.timestamp,
                Some(Utc.with_ymd_and_hms(2024, 5, 6, 18, 4, 0).unwrap())
            );
        }

        it "converts offset timestamps to UTC" {
            let parsed = parse_timestamp("2024-05-06T15:04:17-03:00").unwrap();
            assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 5, 6, 18, 4, 17).unwrap());
        }

        it "accepts a null timestamp" {
            let raw = r#"{
                "id": "0b8e5c1e-8d0f-4f4e-9d3e-2f2f6a2b7c11",
                "object": "rain",
                "timestamp": null,
                "snapshot": {"image_url": "https://storage/img1.png"}
            }"#;

            let item: Identification = serde_json::from_str(raw).unwrap();

            assert!(item.timestamp.is_none());
            assert!(item.snapshot.timestamp.is_none());
        }

        it "rejects a timestamp that is not a date" {
            let raw = r#"{
                "id": "0b8e5c1e-8d0f-4f4e-9d3e-2f2f6a2b7c11",
                "object": "rain",
                "timestamp": "yesterday",
                "snapshot": {"image_url": "https://storage/img1.png"}
            }"#;

            assert!(serde_json::from_str::<Identification>(raw).is_err());
        }
    }
}
