mod common;

use common::{MockDelay, MockTransport};
use loadcell_mqtt::config::DeviceConfig;
use loadcell_mqtt::loadcell::{
    Command, Error, LoadcellNode, SensorId, WEIGHT_ENABLE, WEIGHT_SENSOR1, WEIGHT_SENSOR1_CONTROL,
    WEIGHT_SENSOR2, WEIGHT_SENSOR2_CONTROL, WeightReport,
};

fn node(sensor: SensorId) -> LoadcellNode<'static, MockTransport> {
    let config = DeviceConfig::default().with_sensor(sensor);
    let mut node = LoadcellNode::new(config.session(MockTransport::new()).unwrap(), sensor);
    node.connect("loadcell1", &mut MockDelay::default()).unwrap();
    node
}

#[test]
fn test_subscription_lists() {
    assert_eq!(
        SensorId::One.subscriptions(),
        &[WEIGHT_SENSOR1_CONTROL, WEIGHT_ENABLE, WEIGHT_SENSOR1]
    );
    assert_eq!(
        SensorId::Two.subscriptions(),
        &[WEIGHT_SENSOR2_CONTROL, WEIGHT_ENABLE, WEIGHT_SENSOR2]
    );
    assert_eq!(SensorId::from_report_topic("weightSensor2"), Some(SensorId::Two));
    assert_eq!(SensorId::from_control_topic("weightSensor2"), None);
}

#[test]
fn test_parse_control_commands() {
    assert_eq!(
        Command::parse(WEIGHT_SENSOR1_CONTROL, "enable"),
        Ok(Some(Command::SensorControl {
            sensor: SensorId::One,
            enable: true
        }))
    );
    assert_eq!(
        Command::parse(WEIGHT_SENSOR2_CONTROL, "disable"),
        Ok(Some(Command::SensorControl {
            sensor: SensorId::Two,
            enable: false
        }))
    );
    assert_eq!(
        Command::parse(WEIGHT_SENSOR1_CONTROL, "reboot"),
        Err(Error::UnknownCommand)
    );
}

#[test]
fn test_parse_weight_enable() {
    assert_eq!(
        Command::parse(WEIGHT_ENABLE, r#"{"enable":false}"#),
        Ok(Some(Command::WeightEnable(false)))
    );
    assert_eq!(
        Command::parse(WEIGHT_ENABLE, "yes please"),
        Err(Error::Decode)
    );
}

#[test]
fn test_parse_measure_request_and_echo() {
    assert_eq!(
        Command::parse(
            WEIGHT_SENSOR2,
            r#"{"command":"measure","timestamp":"2024-05-01T08:00:00Z"}"#
        ),
        Ok(Some(Command::Measure(SensorId::Two)))
    );
    assert_eq!(
        Command::parse(WEIGHT_SENSOR1, r#"{"command":"measure"}"#),
        Ok(Some(Command::Measure(SensorId::One)))
    );
    assert_eq!(
        Command::parse(WEIGHT_SENSOR1, r#"{"command":"tare"}"#),
        Err(Error::UnknownCommand)
    );
    assert_eq!(
        Command::parse(WEIGHT_SENSOR1, r#"{"weight":"4.20"}"#),
        Ok(None)
    );
    assert_eq!(Command::parse("other/topic", "enable"), Err(Error::UnknownCommand));
}

#[test]
fn test_session_from_config_subscribes_sensor_topics() {
    let node = node(SensorId::Two);
    assert_eq!(
        node.session().transport().subscribes(),
        vec![WEIGHT_SENSOR2_CONTROL, WEIGHT_ENABLE, WEIGHT_SENSOR2]
    );
    assert_eq!(node.session().broker().host(), "192.168.1.100");
}

#[test]
fn test_step_without_message() {
    let mut node = node(SensorId::One);
    assert_eq!(node.step("loadcell1", &mut MockDelay::default()), Ok(None));
    assert!(node.is_enabled());
}

#[test]
fn test_step_applies_control_and_clears_slot() {
    let mut node = node(SensorId::One);
    let mut delay = MockDelay::default();

    node.session_mut()
        .transport_mut()
        .inject(WEIGHT_SENSOR1_CONTROL, b"disable");
    assert_eq!(
        node.step("loadcell1", &mut delay),
        Ok(Some(Command::SensorControl {
            sensor: SensorId::One,
            enable: false
        }))
    );
    assert!(!node.is_enabled());
    assert!(!node.session().has_message());

    assert_eq!(node.report(3.5), Ok(false));
    assert!(node.session().transport().publishes().is_empty());

    node.session_mut()
        .transport_mut()
        .inject(WEIGHT_ENABLE, br#"{"enable":true}"#);
    assert_eq!(
        node.step("loadcell1", &mut delay),
        Ok(Some(Command::WeightEnable(true)))
    );
    assert!(node.is_enabled());
}

#[test]
fn test_step_ignores_other_sensor_and_garbage() {
    let mut node = node(SensorId::One);
    let mut delay = MockDelay::default();

    node.session_mut()
        .transport_mut()
        .inject(WEIGHT_SENSOR2_CONTROL, b"disable");
    assert_eq!(node.step("loadcell1", &mut delay), Ok(None));
    assert!(node.is_enabled());

    node.session_mut()
        .transport_mut()
        .inject(WEIGHT_ENABLE, b"not json");
    assert_eq!(node.step("loadcell1", &mut delay), Ok(None));
    assert!(!node.session().has_message());
}

#[test]
fn test_measure_then_report() {
    let mut node = node(SensorId::One);
    let mut delay = MockDelay::default();

    node.session_mut()
        .transport_mut()
        .inject(WEIGHT_SENSOR1, br#"{"command":"measure"}"#);
    assert_eq!(
        node.step("loadcell1", &mut delay),
        Ok(Some(Command::Measure(SensorId::One)))
    );

    assert_eq!(node.report(12.344), Ok(true));
    let published = node.session().transport().publishes();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].0, WEIGHT_SENSOR1);
    assert_eq!(
        WeightReport::parse(&published[0].1),
        Ok(12.34)
    );

    // The broker echoes the report back on the same topic.
    let echo = published[0].1.clone();
    node.session_mut()
        .transport_mut()
        .inject(WEIGHT_SENSOR1, &echo);
    assert_eq!(node.step("loadcell1", &mut delay), Ok(None));
}

#[test]
fn test_report_rejects_nan() {
    let mut node = node(SensorId::Two);
    assert_eq!(node.report(f32::NAN), Err(Error::Encode));
}

#[test]
fn test_step_reconnects_after_drop() {
    let mut node = node(SensorId::One);
    node.session_mut().transport_mut().drop_link();

    assert_eq!(node.step("loadcell1", &mut MockDelay::default()), Ok(None));
    assert_eq!(node.session().transport().connects(), 2);
    assert_eq!(node.session().transport().subscribes().len(), 6);
}
