mod controls;
mod fps;
