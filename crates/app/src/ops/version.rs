/// Print version information
#[derive(clap::Args, Debug, Clone)]
pub struct Version {}

#[async_trait::async_trait]
impl crate::op::Op for Version {
    type Error = std::convert::Infallible;
    type Output = String;

    async fn execute(&self, _ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        Ok(format!("wsio {}", common::version::build_info()))
    }
}
