/// Region codes accepted for the switch's AWS clients.
pub const VALID_AWS_REGIONS: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "ca-central-1",
    "eu-north-1",
    "eu-west-3",
    "eu-west-2",
    "eu-west-1",
    "eu-central-1",
    "eu-south-1",
    "ap-south-1",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-southeast-3",
    "ap-east-1",
    "sa-east-1",
    "cn-north-1",
    "cn-northwest-1",
    "us-gov-east-1",
    "us-gov-west-1",
    "us-gov-secret-1",
    "us-gov-topsecret-1",
    "us-gov-topsecret-2",
    "me-south-1",
    "af-south-1",
    "ap-south-2",
    "ap-southeast-4",
    "eu-central-2",
    "eu-south-2",
    "il-central-1",
    "me-central-1",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid region code {0:?}\nMust be a known AWS region code")]
pub struct InvalidRegion(pub String);

/// Trims and checks a region code, returning it ready for the SDK.
pub fn parse_region(r: &str) -> Result<String, InvalidRegion> {
    let region = r.trim();
    if VALID_AWS_REGIONS.contains(&region) {
        Ok(region.to_string())
    } else {
        Err(InvalidRegion(region.to_string()))
    }
}
