mod lookup;
mod mapper;
mod presenter;
mod tags;
