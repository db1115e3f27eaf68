//! Walks through the holder/watcher lifecycle: bind, scoped watchers,
//! moving the value out, and invalidation when the holder's scope ends.

use std::pin::pin;

use anyhow::{Context, Result};
use stackref::{holder, watch, Watcher};

fn main() -> Result<()> {
    let mut b = pin!(Watcher::new());
    let mut c = pin!(Watcher::new());
    {
        holder!(a = 54325_i32);
        b.as_mut().bind(a.as_ref());
        {
            watch!(d => a.as_ref());
            println!("inner watcher {:?}, holder has {} watchers", d.key(), a.viewer_count());
        }
        println!("after inner scope: {} watcher(s)", a.viewer_count());

        let e = Box::pin(a.as_mut().take());
        println!("moved out; b valid = {}", b.is_valid());

        b.as_mut().bind(e.as_ref());
        c.as_mut().bind(a.as_ref());
        let value = *b.try_borrow().context("reading through b")?;
        println!("b sees {value}, c sees the husk's {}", *c.try_borrow()?);

        let stats = e.stats();
        println!("moved holder stats: {stats:?}");
    }

    if b.is_valid() {
        println!("b still sees {}", *b.borrow());
    } else {
        println!("b invalidated with its holder");
    }
    println!("c valid = {}", c.is_valid());
    Ok(())
}
