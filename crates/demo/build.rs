fn main() {
	if let Err(err) = tether_gen::BuildCtx::from_env().and_then(|ctx| ctx.run()) {
		panic!("tether binding generation failed: {err}");
	}
}
